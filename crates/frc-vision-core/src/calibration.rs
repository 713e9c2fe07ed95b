//! Calibration store loaded from the robot's vision settings file.
//!
//! The file is plain text with one comma-separated record per line:
//!
//! ```text
//! BALL:
//! HMIN,20
//! ...
//! RADIUS,3.5
//!
//! VISIONTAPE:
//! HMIN,60
//! ...
//! ```
//!
//! A section header opens a section, a line with an empty first field closes
//! it. Values are kept as raw strings and converted only when a detector asks
//! for them, so a bad value fails that detection and not the load.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{CalibrationKeyError, CalibrationLoadError, KeyErrorKind};

/// Target classes with their own calibration section.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetClass {
    Ball,
    GoalTarget,
    VisionTape,
}

impl TargetClass {
    pub const ALL: [TargetClass; 3] = [
        TargetClass::Ball,
        TargetClass::GoalTarget,
        TargetClass::VisionTape,
    ];

    /// Section name as written in the settings file, without the colon.
    pub fn name(self) -> &'static str {
        match self {
            TargetClass::Ball => "BALL",
            TargetClass::GoalTarget => "GOALTARGET",
            TargetClass::VisionTape => "VISIONTAPE",
        }
    }

    /// Match a first field against the section headers, ignoring case.
    fn from_header(field: &str) -> Option<Self> {
        let upper = field.to_uppercase();
        let name = upper.strip_suffix(':')?;
        Self::ALL.into_iter().find(|class| class.name() == name)
    }
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw `KEY -> value` pairs of one section. Keys are stored uppercased.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSection {
    class: TargetClass,
    values: BTreeMap<String, String>,
}

impl CalibrationSection {
    fn new(class: TargetClass) -> Self {
        Self {
            class,
            values: BTreeMap::new(),
        }
    }

    pub fn class(&self) -> TargetClass {
        self.class
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(key, raw value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw string value exactly as it appeared in the source.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_uppercase()).map(String::as_str)
    }

    /// Value parsed as an integer. Surrounding whitespace is ignored.
    pub fn get_int(&self, key: &str) -> Result<i64, CalibrationKeyError> {
        let raw = self.require(key)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| self.malformed(key, raw, "an integer"))
    }

    /// Value parsed as a real number. Surrounding whitespace is ignored.
    pub fn get_float(&self, key: &str) -> Result<f64, CalibrationKeyError> {
        let raw = self.require(key)?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| self.malformed(key, raw, "a real number"))
    }

    fn require(&self, key: &str) -> Result<&str, CalibrationKeyError> {
        self.get_raw(key).ok_or_else(|| CalibrationKeyError {
            section: self.class,
            key: key.to_uppercase(),
            kind: KeyErrorKind::Missing,
        })
    }

    fn malformed(&self, key: &str, raw: &str, expected: &'static str) -> CalibrationKeyError {
        CalibrationKeyError {
            section: self.class,
            key: key.to_uppercase(),
            kind: KeyErrorKind::Malformed {
                value: raw.to_string(),
                expected,
            },
        }
    }
}

/// Per-target-class calibration values, immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationStore {
    ball: CalibrationSection,
    goal_target: CalibrationSection,
    vision_tape: CalibrationSection,
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self {
            ball: CalibrationSection::new(TargetClass::Ball),
            goal_target: CalibrationSection::new(TargetClass::GoalTarget),
            vision_tape: CalibrationSection::new(TargetClass::VisionTape),
        }
    }
}

impl CalibrationStore {
    /// Read and parse a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CalibrationLoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CalibrationLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&raw))
    }

    /// Parse settings text. Never fails: unknown lines are ignored.
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Build a store from a sequence of lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::default();
        let mut current: Option<TargetClass> = None;

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            let mut fields = line.split(',');
            let head = fields.next().unwrap_or_default();

            if let Some(class) = TargetClass::from_header(head) {
                current = Some(class);
                continue;
            }
            if head.is_empty() {
                current = None;
                continue;
            }
            let Some(class) = current else {
                continue;
            };

            match fields.next() {
                Some(value) => {
                    store
                        .section_mut(class)
                        .values
                        .insert(head.to_uppercase(), value.to_string());
                }
                None => warn!(
                    "calibration line {}: {:?} has no value in section {}, skipped",
                    idx + 1,
                    line,
                    class
                ),
            }
        }

        store
    }

    pub fn section(&self, class: TargetClass) -> &CalibrationSection {
        match class {
            TargetClass::Ball => &self.ball,
            TargetClass::GoalTarget => &self.goal_target,
            TargetClass::VisionTape => &self.vision_tape,
        }
    }

    fn section_mut(&mut self, class: TargetClass) -> &mut CalibrationSection {
        match class {
            TargetClass::Ball => &mut self.ball,
            TargetClass::GoalTarget => &mut self.goal_target,
            TargetClass::VisionTape => &mut self.vision_tape,
        }
    }

    pub fn ball(&self) -> &CalibrationSection {
        &self.ball
    }

    pub fn goal_target(&self) -> &CalibrationSection {
        &self.goal_target
    }

    pub fn vision_tape(&self) -> &CalibrationSection {
        &self.vision_tape
    }
}
