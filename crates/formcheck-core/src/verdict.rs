//! Rule verdicts and their rendering
//!
//! Every rule reports a value from a small closed vocabulary. The vocabulary
//! is kept as typed enums until export, where a [`Locale`] turns it into the
//! strings written to the output table.

use std::fmt;
use std::str::FromStr;

/// Output column names, in the order [`RuleVerdict::to_columns`] fills them
pub const VERDICT_COLUMNS: [&str; 9] = [
    "KURAL1_STATUS",
    "KURAL2_STATUS",
    "KURAL3_CHECK",
    "KURAL4_STATUS",
    "KURAL5_CASE_1",
    "KURAL5_CASE_2",
    "KURAL5_CASE_3",
    "KURAL5_CASE_4",
    "KURAL5_NOTE",
];

/// Language of the rendered verdict strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    /// The vocabulary used on the plant floor
    Turkish,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "tr" | "turkish" => Ok(Locale::Turkish),
            other => Err(format!("unknown locale '{}' (expected 'en' or 'tr')", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::English => "en",
            Locale::Turkish => "tr",
        })
    }
}

/// KURAL1: do the formula's references match the required inputs?
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralVerdict {
    Correct,
    /// A reference-shaped token does not follow the `C0ddd` grammar
    MalformedReference,
    /// References differ from the expected ones, listed here
    Expected(Vec<String>),
}

impl StructuralVerdict {
    pub fn label(&self, locale: Locale) -> String {
        match (self, locale) {
            (StructuralVerdict::Correct, Locale::English) => "correct".into(),
            (StructuralVerdict::Correct, Locale::Turkish) => "Doğru".into(),
            (StructuralVerdict::MalformedReference, Locale::English) => {
                "incorrect: malformed reference format".into()
            }
            (StructuralVerdict::MalformedReference, Locale::Turkish) => {
                "Hatalı: Geçersiz referans formatı".into()
            }
            (StructuralVerdict::Expected(refs), Locale::English) => {
                format!("incorrect: expected {}", refs.join("-"))
            }
            (StructuralVerdict::Expected(refs), Locale::Turkish) => {
                format!("Hatalı: Beklenen {}", refs.join("-"))
            }
        }
    }
}

/// KURAL2: no reference points at a later ordinal position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingVerdict {
    Compliant,
    NonCompliant,
}

impl OrderingVerdict {
    pub fn label(&self, locale: Locale) -> String {
        match (self, locale) {
            (OrderingVerdict::Compliant, Locale::English) => "compliant",
            (OrderingVerdict::Compliant, Locale::Turkish) => "Uygun",
            (OrderingVerdict::NonCompliant, Locale::English) => "non-compliant",
            (OrderingVerdict::NonCompliant, Locale::Turkish) => "Uygun Değil",
        }
        .into()
    }
}

/// KURAL3: completeness and order of the referenced characteristics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletenessReport {
    /// Required names the formula does not reference
    pub missing: Vec<String>,
    /// Referenced names the specification does not require
    pub extra: Vec<String>,
    /// References resolve to a sequence other than the required one
    pub sequence_error: bool,
}

impl CompletenessReport {
    pub fn is_correct(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && !self.sequence_error
    }

    pub fn label(&self, locale: Locale) -> String {
        let (correct, missing, extra, sequence) = match locale {
            Locale::English => ("correct", "missing", "extra", "sequence error"),
            Locale::Turkish => ("Doğru", "Eksik", "Fazla", "Sıra Hatası"),
        };

        if self.is_correct() {
            return correct.into();
        }

        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("{}: {}", missing, self.missing.join(", ")));
        }
        if !self.extra.is_empty() {
            parts.push(format!("{}: {}", extra, self.extra.join(", ")));
        }
        if self.sequence_error {
            parts.push(sequence.to_string());
        }
        parts.join("; ")
    }
}

/// KURAL4: ordinal position follows the 10, 20, 30, ... numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepVerdict {
    Correct,
    IncorrectStep,
}

impl StepVerdict {
    pub fn label(&self, locale: Locale) -> String {
        match (self, locale) {
            (StepVerdict::Correct, Locale::English) => "correct",
            (StepVerdict::Correct, Locale::Turkish) => "Doğru",
            (StepVerdict::IncorrectStep, Locale::English) => "incorrect step increase",
            (StepVerdict::IncorrectStep, Locale::Turkish) => "Hatalı sıra artışı",
        }
        .into()
    }
}

/// KURAL5: verdict for one boundary combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseVerdict {
    /// Computed value lies within the characteristic's own limits
    Favorable,
    /// Computed value lies outside the characteristic's own limits
    Unfavorable,
    /// A limit is absent or the substituted expression cannot be evaluated
    MissingData,
    /// The computed characteristic declares no limit at all
    NoToleranceLimit,
    /// The formula does not reference exactly two characteristics
    Unsupported { found: usize },
}

impl CaseVerdict {
    pub fn label(&self, locale: Locale) -> String {
        match (self, locale) {
            (CaseVerdict::Favorable, Locale::English) => "favorable".into(),
            (CaseVerdict::Favorable, Locale::Turkish) => "Olumlu".into(),
            (CaseVerdict::Unfavorable, Locale::English) => "unfavorable".into(),
            (CaseVerdict::Unfavorable, Locale::Turkish) => "Olumsuz".into(),
            (CaseVerdict::MissingData, Locale::English) => "missing data".into(),
            (CaseVerdict::MissingData, Locale::Turkish) => "Veri eksik".into(),
            (CaseVerdict::NoToleranceLimit, Locale::English) => {
                "no tolerance limit defined".into()
            }
            (CaseVerdict::NoToleranceLimit, Locale::Turkish) => "FormülChar limiti yok".into(),
            (CaseVerdict::Unsupported { found }, locale) => unsupported_label(*found, locale),
        }
    }
}

/// KURAL5: explanatory note accompanying the four cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryNote {
    Unsupported { found: usize },
    CharacteristicNotFound,
}

impl BoundaryNote {
    pub fn label(&self, locale: Locale) -> String {
        match (self, locale) {
            (BoundaryNote::Unsupported { found }, locale) => unsupported_label(*found, locale),
            (BoundaryNote::CharacteristicNotFound, Locale::English) => {
                "characteristic for A or B not found".into()
            }
            (BoundaryNote::CharacteristicNotFound, Locale::Turkish) => {
                "A veya B için karakteristik bulunamadı".into()
            }
        }
    }
}

fn unsupported_label(found: usize, locale: Locale) -> String {
    match locale {
        Locale::English => format!("only two references are supported; found {}", found),
        Locale::Turkish => format!("KURAL5: Sadece 2 referans destekleniyor; mevcut: {}", found),
    }
}

/// KURAL5 result: four boundary cases plus an optional note
///
/// Cases are ordered (A low, B low), (A low, B up), (A up, B low), (A up, B up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryCheck {
    pub cases: [CaseVerdict; 4],
    pub note: Option<BoundaryNote>,
}

impl BoundaryCheck {
    /// All four cases share one verdict
    pub fn uniform(verdict: CaseVerdict, note: Option<BoundaryNote>) -> Self {
        Self {
            cases: [verdict; 4],
            note,
        }
    }

    /// Every case is favorable
    ///
    /// The output keeps the cases independent; this is for callers that
    /// want a single pass/fail.
    pub fn all_favorable(&self) -> bool {
        self.cases.iter().all(|c| *c == CaseVerdict::Favorable)
    }
}

/// Outcome of the five rules for one record
///
/// `None` marks a rule that does not apply to the record (rendered empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleVerdict {
    pub structural: Option<StructuralVerdict>,
    pub ordering: Option<OrderingVerdict>,
    pub completeness: Option<CompletenessReport>,
    pub step: StepVerdict,
    pub boundary: Option<BoundaryCheck>,
}

impl RuleVerdict {
    /// A verdict where only the step rule applies
    pub fn step_only(step: StepVerdict) -> Self {
        Self {
            structural: None,
            ordering: None,
            completeness: None,
            step,
            boundary: None,
        }
    }

    /// Render into the nine output columns of [`VERDICT_COLUMNS`]
    pub fn to_columns(&self, locale: Locale) -> [String; 9] {
        let mut columns: [String; 9] = Default::default();

        columns[0] = render(self.structural.as_ref(), |v| v.label(locale));
        columns[1] = render(self.ordering.as_ref(), |v| v.label(locale));
        columns[2] = render(self.completeness.as_ref(), |v| v.label(locale));
        columns[3] = self.step.label(locale);

        if let Some(boundary) = &self.boundary {
            for (slot, case) in columns[4..8].iter_mut().zip(boundary.cases.iter()) {
                *slot = case.label(locale);
            }
            columns[8] = render(boundary.note.as_ref(), |n| n.label(locale));
        }

        columns
    }
}

fn render<T>(value: Option<&T>, label: impl Fn(&T) -> String) -> String {
    value.map(label).unwrap_or_default()
}
