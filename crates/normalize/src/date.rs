use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_dmy4, r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{4})\b");
re!(re_ymd4, r"\b(\d{4})[./-](\d{1,2})[./-](\d{1,2})\b");
re!(re_dmy2, r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{2})\b");

/// Accepted model-date formats: day-month-year then year-month-day, each in
/// 2- and 4-digit-year form, with '.', '-' and '/' separators. The
/// 2-digit-year groups must come first: chrono's `%Y` also accepts short
/// years, so `12.03.24` would otherwise parse as year 24 AD.
const MODEL_DATE_FORMATS: &[&str] = &[
    "%d.%m.%y", "%d-%m-%y", "%d/%m/%y",
    "%y.%m.%d", "%y-%m-%d", "%y/%m/%d",
    "%d.%m.%Y", "%d-%m-%Y", "%d/%m/%Y",
    "%Y.%m.%d", "%Y-%m-%d", "%Y/%m/%d",
];

/// Resolves the receipt date from the model output, falling back to a regex
/// scan of the OCR text.
///
/// A well-formed model date strictly after `today` is rejected and resolution
/// falls through to the OCR scan, which itself applies no future check. That
/// asymmetry is the intended fallback policy: the model date is treated as a
/// claim to be validated, the OCR text as raw evidence taken at face value.
pub fn resolve_date(
    model_date: Option<&str>,
    recognized_text: &str,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if let Some(candidate) = model_date {
        if let Some(date) = parse_model_date(candidate) {
            if date <= today {
                return Some(date);
            }
            tracing::debug!("Model date {date} is in the future, scanning OCR text");
        }
    }
    scan_recognized_text(recognized_text)
}

fn parse_model_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    MODEL_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// First date-shaped substring of the OCR text, in pattern-list order:
/// `dd.mm.yyyy`, then `yyyy.mm.dd`, then `dd.mm.yy`.
fn scan_recognized_text(text: &str) -> Option<NaiveDate> {
    if let Some(d) = try_dmy4(text) {
        return Some(d);
    }
    if let Some(d) = try_ymd4(text) {
        return Some(d);
    }
    try_dmy2(text)
}

fn try_dmy4(text: &str) -> Option<NaiveDate> {
    re_dmy4().captures_iter(text).find_map(|c| {
        let day: u32 = c.get(1)?.as_str().parse().ok()?;
        let month: u32 = c.get(2)?.as_str().parse().ok()?;
        let year: i32 = c.get(3)?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn try_ymd4(text: &str) -> Option<NaiveDate> {
    re_ymd4().captures_iter(text).find_map(|c| {
        let year: i32 = c.get(1)?.as_str().parse().ok()?;
        let month: u32 = c.get(2)?.as_str().parse().ok()?;
        let day: u32 = c.get(3)?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn try_dmy2(text: &str) -> Option<NaiveDate> {
    re_dmy2().captures_iter(text).find_map(|c| {
        let day: u32 = c.get(1)?.as_str().parse().ok()?;
        let month: u32 = c.get(2)?.as_str().parse().ok()?;
        let year: i32 = 2000 + c.get(3)?.as_str().parse::<i32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}
