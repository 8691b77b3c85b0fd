//! Startup pipeline: fetch, select, load, compose, encode.

use crate::rendering::compose;
use crate::select::split_days;
use crate::{Composite, Error, ImageLoader, Result, ServiceConfig, TimetableSource};

/// Build the composite served by `/timetables`.
///
/// Runs strictly sequentially. Errors:
/// - [`Error::EmptyTimetable`] when nothing is published, or nothing carries
///   a day marker
/// - [`Error::NoImages`] when entries were selected but every image failed
/// - fetch and encode errors are passed through
pub fn build_composite<S>(source: &mut S, loader: &ImageLoader, config: &ServiceConfig) -> Result<Composite>
where
    S: TimetableSource + ?Sized,
{
    let entries = source.fetch_timetables()?;
    if entries.is_empty() {
        return Err(Error::EmptyTimetable);
    }

    let days = split_days(&entries, config);
    log::info!(
        "Selected {} entries for {:?} and {} for {:?}",
        days.today.len(),
        config.today_marker,
        days.tomorrow.len(),
        config.tomorrow_marker
    );
    if days.is_empty() {
        return Err(Error::EmptyTimetable);
    }

    let today = compose::compose_group(loader.load_all(&days.today));
    let tomorrow = compose::compose_group(loader.load_all(&days.tomorrow));
    let img = compose::assemble(today, tomorrow).ok_or(Error::NoImages)?;

    let composite = Composite::from_image(&img, config.jpeg_quality)?;
    log::info!(
        "Composite ready: {}x{}, {} bytes, etag {}",
        composite.width,
        composite.height,
        composite.len(),
        composite.etag
    );
    Ok(composite)
}
