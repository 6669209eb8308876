//! Festival-season detection against a static promotional calendar.
//!
//! The date is injected by the caller, so the detector stays a pure
//! function and tests never touch the process clock. Year is ignored;
//! every window sits inside a single calendar year.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One named promotional window, bounds inclusive, as (month, day).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FestivalWindow {
    pub name: &'static str,
    pub start: (u32, u32),
    pub end: (u32, u32),
    pub strategy: &'static str,
}

/// Windows are checked in order and the first match wins. The table is
/// kept non-overlapping, so first-match is a tie-break policy only.
pub const FESTIVAL_CALENDAR: &[FestivalWindow] = &[
    FestivalWindow {
        name: "Republic Day Sale",
        start: (1, 20),
        end: (1, 31),
        strategy: "Run a visible limited-period discount; shoppers expect sale pricing this week",
    },
    FestivalWindow {
        name: "Holi Sale",
        start: (3, 15),
        end: (3, 25),
        strategy: "Lean on colorful seasonal creatives and small festive bundles",
    },
    FestivalWindow {
        name: "Summer Sale",
        start: (4, 1),
        end: (5, 31),
        strategy: "Position against summer needs and push volume over margin",
    },
    FestivalWindow {
        name: "Independence Day Sale",
        start: (8, 10),
        end: (8, 20),
        strategy: "Anchor messaging on national-sale week; match marketplace-wide promotions",
    },
    FestivalWindow {
        name: "Diwali/Festive Season",
        start: (10, 1),
        end: (11, 15),
        strategy: "Peak gifting season: bundle with gift packaging and festive offers",
    },
    FestivalWindow {
        name: "Year-End Sale",
        start: (12, 15),
        end: (12, 31),
        strategy: "Clearance framing works; pair price cuts with stock-limited urgency",
    },
];

/// Active promotional context for the analysis date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FestivalContext {
    pub festival_name: String,
    pub festival_strategy: String,
}

/// Return the festival window covering `today`, if any.
pub fn active_festival(today: NaiveDate) -> Option<FestivalContext> {
    let (month, day) = (today.month(), today.day());

    FESTIVAL_CALENDAR
        .iter()
        .find(|window| {
            let (start_month, start_day) = window.start;
            let (end_month, end_day) = window.end;
            let after_start = month > start_month || (month == start_month && day >= start_day);
            let before_end = month < end_month || (month == end_month && day <= end_day);
            after_start && before_end
        })
        .map(|window| FestivalContext {
            festival_name: window.name.to_owned(),
            festival_strategy: window.strategy.to_owned(),
        })
}
