//! Locale-tolerant parsing of clipping timestamps.
//!
//! Metadata lines look like
//! `- Your Highlight on page 5 | Added on Monday, January 1, 2019 11:13:08 PM`
//! or, on a Spanish device,
//! `- Tu subrayado | Añadido el miércoles, 12 de enero de 2022 19:34:55`.
//! Everything after the first `", "` is treated as the date fragment, which is
//! tokenized and matched against month and weekday names from the languages
//! Kindle firmware ships with. Anything unrecognized yields `None`.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

/// Extract and parse the date from a full metadata line.
///
/// Returns `None` when the line has no `", "` separator or the fragment after
/// it cannot be read as a date.
pub fn parse_metadata_date(line: &str) -> Option<NaiveDateTime> {
    let parsed = line
        .split_once(", ")
        .and_then(|(_, fragment)| parse_date(fragment));
    if parsed.is_none() {
        debug!(line, "date was not identified");
    }
    parsed
}

/// Parse a human-readable date fragment such as `12 de enero de 2022 19:34:55`.
pub fn parse_date(fragment: &str) -> Option<NaiveDateTime> {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(fragment, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(fragment, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }

    let mut parts = DateParts::default();
    let lowered = fragment.to_lowercase().replace(',', " ");
    for token in lowered.split_whitespace() {
        parts.absorb(token)?;
    }
    parts.build()
}

#[derive(Debug, Default)]
struct DateParts {
    day: Option<u32>,
    month: Option<u32>,
    year: Option<i32>,
    time: Option<(u32, u32, u32)>,
    pm: Option<bool>,
}

impl DateParts {
    /// Fold one token into the parts; `None` means the token is not part of
    /// any date grammar we accept.
    fn absorb(&mut self, token: &str) -> Option<()> {
        if FILLER_WORDS.contains(&token) || is_weekday(token) {
            return Some(());
        }

        match token {
            "am" | "a.m." => return set_once(&mut self.pm, false),
            "pm" | "p.m." => return set_once(&mut self.pm, true),
            _ => {}
        }

        if token.contains(':') {
            return set_once(&mut self.time, parse_clock(token)?);
        }

        if let Some(month) = month_number(token.trim_end_matches('.')) {
            return set_once(&mut self.month, month);
        }

        let number = strip_ordinal(token)?;
        if number.len() == 4 {
            return set_once(&mut self.year, number.parse().ok()?);
        }
        let value: u32 = number.parse().ok()?;
        if (1..=31).contains(&value) {
            return set_once(&mut self.day, value);
        }
        None
    }

    fn build(self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)?;
        let (mut hour, minute, second) = self.time.unwrap_or((0, 0, 0));
        match self.pm {
            Some(true) if hour < 12 => hour += 12,
            Some(false) if hour == 12 => hour = 0,
            Some(_) if hour > 12 => return None,
            _ => {}
        }
        date.and_hms_opt(hour, minute, second)
    }
}

/// Set a slot exactly once; a second value for the same slot is ambiguous.
fn set_once<T>(slot: &mut Option<T>, value: T) -> Option<()> {
    if slot.is_some() {
        return None;
    }
    *slot = Some(value);
    Some(())
}

fn parse_clock(token: &str) -> Option<(u32, u32, u32)> {
    let fields: Vec<u32> = token
        .split(':')
        .map(|f| f.parse().ok())
        .collect::<Option<_>>()?;
    match fields.as_slice() {
        [h, m] => Some((*h, *m, 0)),
        [h, m, s] => Some((*h, *m, *s)),
        _ => None,
    }
}

/// `1st`, `2nd`, `1.`, `1º`, `1er` → the leading digits.
fn strip_ordinal(token: &str) -> Option<&str> {
    let end = token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    if end == 0 {
        return None;
    }
    let (digits, suffix) = token.split_at(end);
    ORDINAL_SUFFIXES.contains(&suffix).then_some(digits)
}

fn month_number(token: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(_, names)| names.contains(&token))
        .map(|(n, _)| *n)
}

fn is_weekday(token: &str) -> bool {
    WEEKDAYS.contains(&token.trim_end_matches('.'))
}

const ORDINAL_SUFFIXES: &[&str] = &["", ".", "st", "nd", "rd", "th", "º", "ª", "°", "er", "o"];

const FILLER_WORDS: &[&str] = &[
    "of", "the", "at", "on", "de", "del", "el", "a", "las", "le", "à", "às", "um", "den", "in",
    "data", "-",
];

const WEEKDAYS: &[&str] = &[
    // en
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "mon", "tue", "wed", "thu", "fri", "sat", "sun",
    // es
    "lunes", "martes", "miércoles", "miercoles", "jueves", "viernes", "sábado", "sabado",
    "domingo",
    // fr
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
    // de
    "montag", "dienstag", "mittwoch", "donnerstag", "freitag", "samstag", "sonntag",
    // it
    "lunedì", "martedì", "mercoledì", "giovedì", "venerdì", "sabato", "domenica",
    // pt
    "segunda-feira", "terça-feira", "quarta-feira", "quinta-feira", "sexta-feira",
];

const MONTHS: &[(u32, &[&str])] = &[
    (1, &["january", "jan", "enero", "janvier", "januar", "gennaio", "janeiro"]),
    (2, &["february", "feb", "febrero", "février", "fevrier", "februar", "febbraio", "fevereiro"]),
    (3, &["march", "mar", "marzo", "mars", "märz", "marz", "março", "marco"]),
    (4, &["april", "apr", "abril", "avril", "aprile"]),
    (5, &["may", "mayo", "mai", "maggio", "maio"]),
    (6, &["june", "jun", "junio", "juin", "juni", "giugno", "junho"]),
    (7, &["july", "jul", "julio", "juillet", "juli", "luglio", "julho"]),
    (8, &["august", "aug", "agosto", "août", "aout"]),
    (9, &["september", "sep", "sept", "septiembre", "setiembre", "septembre", "settembre", "setembro"]),
    (10, &["october", "oct", "octubre", "octobre", "oktober", "ottobre", "outubro"]),
    (11, &["november", "nov", "noviembre", "novembre", "novembro"]),
    (12, &["december", "dec", "diciembre", "décembre", "decembre", "dezember", "dicembre", "dezembro"]),
];
