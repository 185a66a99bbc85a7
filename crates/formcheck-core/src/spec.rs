//! Formula specification: which inputs each derived characteristic must reference
//!
//! The table is keyed by site code, then by the name of the derived
//! characteristic, and lists the required input characteristic names in the
//! order the formula is expected to use them. It is loaded once per run and
//! only ever read afterwards.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Production site code selecting a sub-table of the specification
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteCode(String);

impl SiteCode {
    pub fn new<S: AsRef<str>>(code: S) -> Self {
        SiteCode(code.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SiteCode {
    fn default() -> Self {
        SiteCode::new("3101")
    }
}

impl FromStr for SiteCode {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(SiteCode::new(s))
    }
}

impl fmt::Display for SiteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Required formula inputs for every derived characteristic of one site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteFormulas(BTreeMap<String, Vec<String>>);

impl SiteFormulas {
    /// Required input names for a characteristic, in formula order
    pub fn required_inputs(&self, characteristic: &str) -> Option<&[String]> {
        self.0.get(characteristic).map(Vec::as_slice)
    }

    /// Number of derived characteristics known for this site
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate derived characteristic names with their required inputs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, V, I> FromIterator<(K, I)> for SiteFormulas
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = V>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        SiteFormulas(
            iter.into_iter()
                .map(|(k, inputs)| (k.into(), inputs.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

/// The full per-site formula specification
///
/// Serialized as a JSON object: `{ "<site>": { "<characteristic>": ["<input>", ...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormulaSpec {
    sites: BTreeMap<SiteCode, SiteFormulas>,
}

impl FormulaSpec {
    /// Create an empty specification
    pub fn new() -> Self {
        Self::default()
    }

    /// The specification shipped with formcheck (sites 2901, 3101, 3102, 3103)
    pub fn builtin() -> Self {
        let mut spec = Self::new();

        let dairy_site = |kmy: [&'static str; 2], kmt: [&'static str; 2]| {
            vec![
                ("YKM G/G", vec!["KM G/G", "YAG G/G"]),
                ("YKM2 G/G", vec!["KM2 G/G", "YAG2 G/G"]),
                ("YKM3 G/G", vec!["KM3 G/G", "YAG3 G/G"]),
                ("LOS2", vec!["KM2 G/G", "YAG2 G/G", "PRT2 G/G"]),
                ("LOS3", vec!["KM3 G/G", "YAG3 G/G", "PRT3 G/G"]),
                ("KMT", kmt.to_vec()),
                ("KMY", kmy.to_vec()),
            ]
        };

        spec.insert_site(
            SiteCode::new("3101"),
            dairy_site(["YAG G/G", "KM G/G"], ["TUZ", "KM G/G"]).into_iter().collect(),
        );
        spec.insert_site(
            SiteCode::new("3102"),
            dairy_site(["YAG G/G", "KM G/G"], ["TUZ", "KM G/G"]).into_iter().collect(),
        );

        let mut site_3103 = dairy_site(["YAG3 G/G", "KM3 G/G"], ["TUZ", "KM3 G/G"]);
        site_3103.push(("KMY3", vec!["YAG3 G/G", "KM3 G/G"]));
        site_3103.push(("KMT3", vec!["TUZ", "KM3 G/G"]));
        spec.insert_site(SiteCode::new("3103"), site_3103.into_iter().collect());

        spec.insert_site(
            SiteCode::new("2901"),
            [
                ("TOPLAMBD", vec!["NEM", "YAG", "PROTEIN", "KUL"]),
                ("Kx100/P", vec!["KOLAJEN", "PROTEIN"]),
                ("SKx100/P", vec!["SKOLAJEN", "SPROTEIN"]),
                ("SY/SP", vec!["SYAG", "SPROTEIN"]),
                ("Y/P", vec!["YAG", "PROTEIN"]),
                ("SN/SP", vec!["SNEM", "SPROTEIN"]),
                ("N/P", vec!["NEM", "PROTEIN"]),
            ]
            .into_iter()
            .collect(),
        );

        spec
    }

    /// Parse a specification from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a specification from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize the specification to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add or replace the table of one site
    pub fn insert_site(&mut self, code: SiteCode, formulas: SiteFormulas) {
        self.sites.insert(code, formulas);
    }

    /// Table of one site, if known
    pub fn site(&self, code: &SiteCode) -> Option<&SiteFormulas> {
        self.sites.get(code)
    }

    /// Known site codes in ascending order
    pub fn site_codes(&self) -> impl Iterator<Item = &SiteCode> {
        self.sites.keys()
    }
}
