use serde::{Deserialize, Deserializer, Serialize};

/// Previews longer than this many characters are cut short
const PREVIEW_LIMIT: usize = 60;

/// Number of characters of a long preview that are kept before the ellipsis
const PREVIEW_KEEP: usize = 57;

/// The note recorded for a single day
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JournalEntry {
    #[serde(default, deserialize_with = "null_as_blank")]
    pub(crate) school: String,
    #[serde(default, deserialize_with = "null_as_blank")]
    pub(crate) career: String,
    #[serde(default, deserialize_with = "null_as_blank")]
    pub(crate) personal: String,
    /// Hours, rounded to one decimal place
    #[serde(default)]
    pub(crate) screen_time: Option<f64>,
    #[serde(default)]
    pub(crate) pickups: Option<u32>,
}

impl JournalEntry {
    /// Normalize raw form input into an entry.  Returns `None` if nothing
    /// meaningful was entered.
    pub(crate) fn from_fields(fields: &RawFields) -> Option<JournalEntry> {
        let entry = JournalEntry {
            school: fields.school.trim().to_owned(),
            career: fields.career.trim().to_owned(),
            personal: fields.personal.trim().to_owned(),
            screen_time: parse_amount(&fields.screen_time).map(round_tenths),
            pickups: parse_amount(&fields.pickups).and_then(round_count),
        };
        (!entry.is_empty()).then_some(entry)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.texts().all(str::is_empty) && self.screen_time.is_none() && self.pickups.is_none()
    }

    /// The first non-blank text field, shortened for display in a day cell
    pub(crate) fn preview(&self) -> Option<String> {
        let line = self.texts().find(|s| !s.is_empty())?;
        if line.chars().count() > PREVIEW_LIMIT {
            let mut short = line.chars().take(PREVIEW_KEEP).collect::<String>();
            short.push('…');
            Some(short)
        } else {
            Some(line.to_owned())
        }
    }

    /// Short labels for the numeric fields.  Zero values are not shown.
    pub(crate) fn chips(&self) -> Vec<String> {
        let mut chips = Vec::new();
        if let Some(hours) = self.screen_time.filter(|&h| h > 0.0) {
            chips.push(format!("{hours}h"));
        }
        if let Some(pickups) = self.pickups.filter(|&p| p > 0) {
            chips.push(format!("{pickups} pickups"));
        }
        chips
    }

    fn texts(&self) -> impl Iterator<Item = &str> {
        [&self.school, &self.career, &self.personal]
            .into_iter()
            .map(|s| s.trim())
    }
}

/// The contents of the edit form, exactly as typed
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct RawFields {
    pub(crate) school: String,
    pub(crate) career: String,
    pub(crate) personal: String,
    pub(crate) screen_time: String,
    pub(crate) pickups: String,
}

impl RawFields {
    pub(crate) fn get(&self, field: Field) -> &str {
        match field {
            Field::School => &self.school,
            Field::Career => &self.career,
            Field::Personal => &self.personal,
            Field::ScreenTime => &self.screen_time,
            Field::Pickups => &self.pickups,
        }
    }

    pub(crate) fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::School => &mut self.school,
            Field::Career => &mut self.career,
            Field::Personal => &mut self.personal,
            Field::ScreenTime => &mut self.screen_time,
            Field::Pickups => &mut self.pickups,
        }
    }
}

impl From<&JournalEntry> for RawFields {
    fn from(entry: &JournalEntry) -> RawFields {
        RawFields {
            school: entry.school.clone(),
            career: entry.career.clone(),
            personal: entry.personal.clone(),
            screen_time: entry.screen_time.map(|h| h.to_string()).unwrap_or_default(),
            pickups: entry.pickups.map(|p| p.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Field {
    School,
    Career,
    Personal,
    ScreenTime,
    Pickups,
}

impl Field {
    pub(crate) const ALL: [Field; 5] = [
        Field::School,
        Field::Career,
        Field::Personal,
        Field::ScreenTime,
        Field::Pickups,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Field::School => "School",
            Field::Career => "Career",
            Field::Personal => "Personal",
            Field::ScreenTime => "Screen time (h)",
            Field::Pickups => "Pickups",
        }
    }

    pub(crate) fn next(self) -> Field {
        match self {
            Field::School => Field::Career,
            Field::Career => Field::Personal,
            Field::Personal => Field::ScreenTime,
            Field::ScreenTime => Field::Pickups,
            Field::Pickups => Field::School,
        }
    }

    pub(crate) fn previous(self) -> Field {
        match self {
            Field::School => Field::Pickups,
            Field::Career => Field::School,
            Field::Personal => Field::Career,
            Field::ScreenTime => Field::Personal,
            Field::Pickups => Field::ScreenTime,
        }
    }
}

/// Every `f64` at or above this has no fractional part
const INTEGRAL_FLOOR: f64 = 4_503_599_627_370_496.0;

/// Enough decimal places to print any `f64` exactly
const EXACT_PLACES: usize = 1100;

// Empty, unparseable, infinite, and negative input all count as "nothing
// entered".  Input consisting only of whitespace is zero.
fn parse_amount(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        // Turn -0.0 into 0.0
        .map(f64::abs)
}

// Round to one decimal place by the exact decimal expansion of `value`,
// rounding exact ties up, so `1.45` (really 1.4499999...) becomes 1.4
fn round_tenths(value: f64) -> f64 {
    if value >= INTEGRAL_FLOOR {
        return value;
    }
    let exact = format!("{value:.EXACT_PLACES$}");
    let Some((whole, fraction)) = exact.split_once('.') else {
        return value;
    };
    let mut digits = fraction.bytes().map(|b| u64::from(b - b'0'));
    let (Ok(whole), Some(tenth), Some(hundredth)) =
        (whole.parse::<u64>(), digits.next(), digits.next())
    else {
        return value;
    };
    let tenths = whole * 10 + tenth + u64::from(hundredth >= 5);
    format!("{}.{}", tenths / 10, tenths % 10)
        .parse()
        .unwrap_or(value)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_count(value: f64) -> Option<u32> {
    let rounded = value.round();
    (rounded <= f64::from(u32::MAX)).then(|| rounded as u32)
}

fn null_as_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
