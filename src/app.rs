//! One render pass, from fetching to flushing

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use image::RgbaImage;

use crate::config::StatusFile;
use crate::render::font::FontSet;
use crate::render::layout::{DAY_NAMES, TITLE_POSITION};
use crate::render::RenderContext;
use crate::schedule::{self, RawDayRecord, UNKNOWN_LOCATION};
use crate::sink::DisplaySink;
use crate::source::{LocationSource, Whereabouts};

/// Fixed parts of a frame
pub struct Scene<'a> {
    pub title: &'a str,
    pub id_card: &'a RgbaImage,
    pub today: NaiveDate,
    pub fonts: &'a FontSet,
}

impl Scene<'_> {
    /// 0 for Monday, 5 and 6 at the weekend
    pub fn weekday(&self) -> u32 {
        self.today.weekday().num_days_from_monday()
    }
}

/// Ask the source for the week, falling back to no records at all
fn fetch_week(source: &dyn LocationSource) -> Vec<RawDayRecord> {
    match source.fetch() {
        Ok(Whereabouts::Week(records)) => {
            log::info!("Fetched {} day records", records.len());
            records
        }
        Ok(Whereabouts::Description(_)) => {
            log::warn!("Source sent a single description, expected a week of records");
            Vec::new()
        }
        Err(e) => {
            log::warn!("No whereabouts, drawing an empty week: {:#}", e);
            Vec::new()
        }
    }
}

/// Ask the source for a status description, falling back to unknown
fn fetch_description(source: &dyn LocationSource) -> String {
    match source.fetch() {
        Ok(Whereabouts::Description(description)) => description,
        Ok(Whereabouts::Week(records)) => {
            log::warn!("Source sent {} day records, expected a description", records.len());
            UNKNOWN_LOCATION.to_string()
        }
        Err(e) => {
            log::warn!("No status, showing {:?}: {:#}", UNKNOWN_LOCATION, e);
            UNKNOWN_LOCATION.to_string()
        }
    }
}

/// Week mode: fetch, draw and flush
pub fn run_week<S: DisplaySink>(source: &dyn LocationSource, sink: &mut S, scene: &Scene) -> Result<()> {
    let records = fetch_week(source);
    render_week(sink, scene, records)
}

/// Draw today and the week from raw records and flush the frame
///
/// A malformed date aborts before anything reaches the panel.
pub fn render_week<S: DisplaySink>(sink: &mut S, scene: &Scene, raw: Vec<RawDayRecord>) -> Result<()> {
    let records = schedule::normalize(raw)?;
    let today_label = schedule::today_location(&records, scene.today);
    let week = schedule::week_locations(&records);
    log::info!("Today ({}): {}", scene.today, today_label);

    for slot in week.misaligned_slots() {
        let day = DAY_NAMES.get(slot).copied().unwrap_or("no weekday");
        log::warn!("Record {} is not dated on {}, drawn there anyway", slot, day);
    }

    let weekday = scene.weekday();
    let mut ctx = RenderContext::new(sink);
    ctx.draw_image(scene.id_card);
    ctx.draw_title(scene.title, &scene.fonts.title, TITLE_POSITION);
    ctx.draw_week(&week, weekday, scene.fonts);
    ctx.draw_today(&today_label, weekday, scene.fonts);
    ctx.flush()
}

/// Status mode: draw the description in today's cell
///
/// The title is drawn in the smaller caption font.
/// Returns `false` without touching the panel when the description matches
/// the one stored in `status` and `force` is off. After a refresh the new
/// description is written back to the file.
pub fn run_status<S: DisplaySink>(
    source: &dyn LocationSource,
    sink: &mut S,
    scene: &Scene,
    status: &mut StatusFile,
    force: bool,
) -> Result<bool> {
    let description = fetch_description(source);

    if !force && description == status.description() {
        log::info!("Status unchanged ({}), panel left alone", description);
        return Ok(false);
    }

    log::info!("Status: {}", description);
    let weekday = scene.weekday();
    let mut ctx = RenderContext::new(sink);
    ctx.draw_image(scene.id_card);
    ctx.draw_title(scene.title, &scene.fonts.caption, TITLE_POSITION);
    ctx.draw_today(&description, weekday, scene.fonts);
    ctx.flush()?;

    status.set_description(&description);
    status.save()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::{self, TEXT_PADDING};
    use crate::sink::memory::MemorySink;
    use anyhow::anyhow;
    use image::Rgba;
    use std::fs;
    use std::path::PathBuf;

    struct Fixed(Option<Whereabouts>);

    impl LocationSource for Fixed {
        fn fetch(&self) -> Result<Whereabouts> {
            self.0.clone().ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn record(date: &str, location: &str) -> RawDayRecord {
        RawDayRecord {
            date: date.to_string(),
            location_am: location.to_string(),
        }
    }

    fn blank_card() -> RgbaImage {
        RgbaImage::from_pixel(212, 104, Rgba([255, 255, 255, 255]))
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 6, 7).unwrap()
    }

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("whereis-{}-{}.txt", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn week_is_flushed_once() {
        let card = blank_card();
        let fonts = FontSet::default();
        let scene = Scene { title: "Where is Todd?", id_card: &card, today: monday(), fonts: &fonts };
        let source = Fixed(Some(Whereabouts::Week(vec![
            record("2021-06-08 09:00:00", "Home"),
            record("2021-06-07 09:00:00", "Office"),
        ])));
        let mut sink = MemorySink::for_panel();

        run_week(&source, &mut sink, &scene).unwrap();

        assert_eq!(sink.frames(), 1);
        let (black, red) = sink.last_frame().unwrap();
        assert_eq!(red.inked_count(), 0);
        let today = layout::today_cell(212, 104, 0);
        let first_line = today.y1 + fonts.today_body.line_height() as i32;
        let inked_in_line = (today.x0 + TEXT_PADDING..today.x1)
            .any(|x| (first_line..first_line + 15).any(|y| black.get(x, y)));
        assert!(inked_in_line, "Office drawn in today's cell");
    }

    #[test]
    fn failed_fetch_still_renders() {
        let card = blank_card();
        let fonts = FontSet::default();
        let scene = Scene { title: "Where is Todd?", id_card: &card, today: monday(), fonts: &fonts };
        let mut sink = MemorySink::for_panel();

        run_week(&Fixed(None), &mut sink, &scene).unwrap();

        assert_eq!(sink.frames(), 1);
        assert!(sink.last_frame().unwrap().0.inked_count() > 0);
    }

    #[test]
    fn bad_date_aborts_before_flush() {
        let card = blank_card();
        let fonts = FontSet::default();
        let scene = Scene { title: "Where is Todd?", id_card: &card, today: monday(), fonts: &fonts };
        let mut sink = MemorySink::for_panel();

        let result = render_week(&mut sink, &scene, vec![record("yesterday", "Office")]);

        assert!(result.is_err());
        assert_eq!(sink.frames(), 0);
    }

    #[test]
    fn weekend_still_renders() {
        let card = blank_card();
        let fonts = FontSet::default();
        let saturday = NaiveDate::from_ymd_opt(2021, 6, 12).unwrap();
        let scene = Scene { title: "Where is Todd?", id_card: &card, today: saturday, fonts: &fonts };
        let mut sink = MemorySink::for_panel();

        render_week(&mut sink, &scene, Vec::new()).unwrap();

        assert_eq!(scene.weekday(), 5);
        assert_eq!(sink.frames(), 1);
    }

    #[test]
    fn unchanged_status_skips_the_panel() {
        let path = temp_config("unchanged", "Todd\ntodd\nsecret\nIn the lab\n");
        let mut status = StatusFile::load(&path).unwrap();
        let card = blank_card();
        let fonts = FontSet::default();
        let scene = Scene { title: "Todd", id_card: &card, today: monday(), fonts: &fonts };
        let source = Fixed(Some(Whereabouts::Description("In the lab".to_string())));
        let mut sink = MemorySink::for_panel();

        let flushed = run_status(&source, &mut sink, &scene, &mut status, false).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(!flushed);
        assert_eq!(sink.frames(), 0);
    }

    #[test]
    fn changed_status_is_drawn_and_remembered() {
        let path = temp_config("changed", "Todd\ntodd\nsecret\nIn the lab\n");
        let mut status = StatusFile::load(&path).unwrap();
        let card = blank_card();
        let fonts = FontSet::default();
        let scene = Scene { title: "Todd", id_card: &card, today: monday(), fonts: &fonts };
        let source = Fixed(Some(Whereabouts::Description("At home".to_string())));
        let mut sink = MemorySink::for_panel();

        let flushed = run_status(&source, &mut sink, &scene, &mut status, false).unwrap();
        let saved = StatusFile::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(flushed);
        assert_eq!(sink.frames(), 1);
        assert_eq!(saved.description(), "At home");
    }

    #[test]
    fn force_redraws_unchanged_status() {
        let path = temp_config("forced", "Todd\ntodd\nsecret\nunknown\n");
        let mut status = StatusFile::load(&path).unwrap();
        let card = blank_card();
        let fonts = FontSet::default();
        let scene = Scene { title: "Todd", id_card: &card, today: monday(), fonts: &fonts };
        let mut sink = MemorySink::for_panel();

        let flushed = run_status(&Fixed(None), &mut sink, &scene, &mut status, true).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(flushed);
        assert_eq!(sink.frames(), 1);
    }

    #[test]
    fn sample_week_renders_with_sample_card() {
        let resources = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources");
        let card = image::open(resources.join("id-card.png")).unwrap().to_rgba8();
        let fonts = FontSet::default();
        let wednesday = NaiveDate::from_ymd_opt(2021, 6, 9).unwrap();
        let scene = Scene { title: "Where is Todd?", id_card: &card, today: wednesday, fonts: &fonts };
        let source = crate::source::OfflineWeek::new(resources.join("example.json"));
        let mut sink = MemorySink::for_panel();

        run_week(&source, &mut sink, &scene).unwrap();

        let (_, red) = sink.last_frame().unwrap();
        assert!(red.inked_count() > 0, "red band of the card survives");
        let today = layout::today_cell(212, 104, 2);
        assert!(!red.get(today.x0 + 5, today.y1 + 5));
    }
}
