use crate::api::{self, AnalysisRequest, AnalysisResponse, Analyzer};
use crate::page::SharedPage;

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter text to analyze.";

#[derive(Debug)]
pub enum Outcome {
    Rendered(AnalysisResponse),
    /// A request was already in flight; nothing happened.
    Busy,
    Failed(api::Error),
}

/// Runs one submit: validate the form, call the analyzer, render or report.
///
/// The submit control is disabled before the call starts and is always
/// restored before this returns, whatever the call did.
pub async fn handle_analyze(
    page: &SharedPage,
    analyzer: &(dyn Analyzer + Send + Sync),
    banner_dismiss: std::time::Duration,
) -> Outcome {
    let req = {
        let mut page = page.lock();
        let text = page.text().to_owned();
        if text.is_empty() {
            None
        } else if !page.begin_submit() {
            log::warn!("submit ignored, a request is already in flight");
            return Outcome::Busy;
        } else {
            Some(AnalysisRequest::new(text, page.selected_image().map(str::to_owned)))
        }
    };

    let req = if let Some(req) = req {
        req
    } else {
        crate::banner::show_error(page, EMPTY_TEXT_MESSAGE, banner_dismiss);
        return Outcome::Failed(api::Error::Validation(EMPTY_TEXT_MESSAGE.to_owned()));
    };

    log::info!("analyze request: {:?}", req);

    let result = async {
        let data = analyzer.analyze_full(&req).await?;
        log::info!("analyze response: {:?}", data);
        crate::render::display_results(&mut page.lock(), &data);
        Ok::<_, api::Error>(data)
    }
    .await;

    page.lock().end_submit();

    match result {
        Ok(data) => Outcome::Rendered(data),
        Err(e) => {
            log::error!("error in analyze: {:?}", e);
            crate::banner::show_error(page, &e.user_message(), banner_dismiss);
            Outcome::Failed(e)
        }
    }
}
