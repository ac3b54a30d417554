//! In-memory model of the analysis page.
//!
//! Elements are looked up by [`ElementId`] and any of them may be missing from
//! a given page. Every accessor tolerates that and degrades to a no-op.

pub type SharedPage = std::sync::Arc<parking_lot::Mutex<Page>>;

pub const BUTTON_DEFAULT_HTML: &str =
    r#"<span class="material-symbols-outlined">query_stats</span><span class="truncate">Analyze</span>"#;
pub const BUTTON_LOADING_HTML: &str = r#"<span class="loading"></span> Analyzing..."#;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    Main,
    TextInput,
    ImageInput,
    ImageStatus,
    AnalyzeButton,
    ResultsSection,
    TextAnalysisResult,
    ImageContextResult,
    SourceVerificationResult,
    FinalVerdictResult,
}

impl ElementId {
    pub const ALL: [ElementId; 10] = [
        ElementId::Main,
        ElementId::TextInput,
        ElementId::ImageInput,
        ElementId::ImageStatus,
        ElementId::AnalyzeButton,
        ElementId::ResultsSection,
        ElementId::TextAnalysisResult,
        ElementId::ImageContextResult,
        ElementId::SourceVerificationResult,
        ElementId::FinalVerdictResult,
    ];

    pub const RESULT_REGIONS: [ElementId; 4] = [
        ElementId::TextAnalysisResult,
        ElementId::ImageContextResult,
        ElementId::SourceVerificationResult,
        ElementId::FinalVerdictResult,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::TextInput => "text-input",
            Self::ImageInput => "image-input",
            Self::ImageStatus => "image-status",
            Self::AnalyzeButton => "analyze-button",
            Self::ResultsSection => "results",
            Self::TextAnalysisResult => "text-analysis-result",
            Self::ImageContextResult => "image-context-result",
            Self::SourceVerificationResult => "source-verification-result",
            Self::FinalVerdictResult => "final-verdict-result",
        }
    }
}

#[derive(Default, Clone, Debug, PartialEq)]
pub struct Element {
    pub inner_html: String,
    /// Current value of a text input.
    pub value: String,
    /// Name of the file selected in a file input.
    pub file_name: Option<String>,
    pub disabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerAnchor {
    BeforeResults,
    TopOfMain,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    pub id: u64,
    pub message: String,
    pub anchor: BannerAnchor,
}

#[derive(Debug, Default)]
pub struct Page {
    elements: std::collections::BTreeMap<ElementId, Element>,
    banner: Option<Banner>,
    next_banner_id: u64,
}

impl Page {
    pub fn new(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let mut elements = std::collections::BTreeMap::new();
        for id in ids {
            let mut element = Element::default();
            if id == ElementId::AnalyzeButton {
                element.inner_html = BUTTON_DEFAULT_HTML.to_owned();
            }
            elements.insert(id, element);
        }
        Self {
            elements,
            banner: None,
            next_banner_id: 0,
        }
    }

    /// A page carrying every element the client knows about.
    pub fn standard() -> Self {
        Self::new(ElementId::ALL)
    }

    pub fn into_shared(self) -> SharedPage {
        std::sync::Arc::new(parking_lot::Mutex::new(self))
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn inner_html(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|e| e.inner_html.as_str())
    }

    /// Returns false when the element is not on the page.
    pub fn set_inner_html(&mut self, id: ElementId, html: String) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.inner_html = html;
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        if let Some(input) = self.element_mut(ElementId::TextInput) {
            input.value = value.into();
        }
    }

    /// Trimmed text input, empty when the input is missing.
    pub fn text(&self) -> &str {
        self.element(ElementId::TextInput).map_or("", |e| e.value.trim())
    }

    pub fn selected_image(&self) -> Option<&str> {
        self.element(ElementId::ImageInput).and_then(|e| e.file_name.as_deref())
    }

    /// Records the file picked in the image input and updates the status line.
    pub fn select_image(&mut self, file_name: Option<String>) {
        let status = match file_name.as_deref() {
            Some(name) => format!(
                r#"<p class="text-sm text-green-600 dark:text-green-400 font-medium">Image uploaded: {}</p>"#,
                handlebars::html_escape(name)
            ),
            None => String::new(),
        };
        if let Some(input) = self.element_mut(ElementId::ImageInput) {
            input.file_name = file_name;
        }
        self.set_inner_html(ElementId::ImageStatus, status);
    }

    /// Puts the submit control into its loading state.
    ///
    /// Returns false if the control is already disabled, meaning a request is
    /// in flight. A page without a submit control always accepts.
    pub fn begin_submit(&mut self) -> bool {
        match self.element_mut(ElementId::AnalyzeButton) {
            Some(button) if button.disabled => false,
            Some(button) => {
                button.disabled = true;
                button.inner_html = BUTTON_LOADING_HTML.to_owned();
                true
            }
            None => true,
        }
    }

    pub fn end_submit(&mut self) {
        if let Some(button) = self.element_mut(ElementId::AnalyzeButton) {
            button.disabled = false;
            button.inner_html = BUTTON_DEFAULT_HTML.to_owned();
        }
    }

    pub fn submit_disabled(&self) -> bool {
        self.element(ElementId::AnalyzeButton).map_or(false, |b| b.disabled)
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Replaces any banner with a new one. Returns `None` when the page has
    /// neither a results section nor a main area to attach it to.
    pub fn insert_banner(&mut self, message: impl Into<String>) -> Option<u64> {
        self.banner = None;

        let anchor = if self.elements.contains_key(&ElementId::ResultsSection) {
            BannerAnchor::BeforeResults
        } else if self.elements.contains_key(&ElementId::Main) {
            BannerAnchor::TopOfMain
        } else {
            return None;
        };

        let id = self.next_banner_id;
        self.next_banner_id += 1;
        self.banner = Some(Banner {
            id,
            message: message.into(),
            anchor,
        });
        Some(id)
    }

    /// Removes the banner with this id. A banner that is already gone, or was
    /// replaced, is left alone.
    pub fn remove_banner(&mut self, id: u64) -> bool {
        if self.banner.as_ref().map(|b| b.id) == Some(id) {
            self.banner = None;
            true
        } else {
            false
        }
    }

    /// Serializes the page into an HTML document.
    pub fn to_html(&self) -> String {
        let banner_at = |anchor: BannerAnchor| {
            self.banner
                .as_ref()
                .filter(|b| b.anchor == anchor)
                .map(|b| format!("<div class=\"error-message\">{}</div>\n", handlebars::html_escape(&b.message)))
                .unwrap_or_default()
        };

        let mut out = String::new();
        out.push_str("<main>\n");
        out.push_str(&banner_at(BannerAnchor::TopOfMain));
        if let Some(status) = self.inner_html(ElementId::ImageStatus).filter(|s| !s.is_empty()) {
            out.push_str(&format!("<div id=\"{}\">{}</div>\n", ElementId::ImageStatus.as_str(), status));
        }
        if let Some(button) = self.inner_html(ElementId::AnalyzeButton) {
            out.push_str(&format!(
                "<button id=\"{}\"{}>{}</button>\n",
                ElementId::AnalyzeButton.as_str(),
                if self.submit_disabled() { " disabled" } else { "" },
                button
            ));
        }
        if self.elements.contains_key(&ElementId::ResultsSection) {
            out.push_str(&banner_at(BannerAnchor::BeforeResults));
            out.push_str("<section class=\"space-y-8\">\n");
        }
        for id in ElementId::RESULT_REGIONS {
            if let Some(html) = self.inner_html(id) {
                out.push_str(&format!("<div id=\"{}\">{}</div>\n", id.as_str(), html));
            }
        }
        if self.elements.contains_key(&ElementId::ResultsSection) {
            out.push_str("</section>\n");
        }
        out.push_str("</main>\n");
        out
    }
}
