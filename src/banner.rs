use crate::page::SharedPage;

pub const DEFAULT_DISMISS_AFTER: std::time::Duration = std::time::Duration::from_secs(5);

/// Shows `message` in the error banner, replacing any banner already up, and
/// schedules its removal after `dismiss_after`.
///
/// Must be called from within a tokio runtime. The removal timer is never
/// cancelled; if the banner was replaced in the meantime the timer leaves the
/// newer one alone.
pub fn show_error(page: &SharedPage, message: &str, dismiss_after: std::time::Duration) -> Option<u64> {
    log::warn!("error banner: {}", message);

    let id = if let Some(id) = page.lock().insert_banner(message) {
        id
    } else {
        log::error!("no place on the page for the error banner");
        return None;
    };

    let page = page.clone();
    tokio::spawn(async move {
        tokio::time::sleep(dismiss_after).await;
        if page.lock().remove_banner(id) {
            log::info!("error banner {} dismissed", id);
        }
    });

    Some(id)
}
