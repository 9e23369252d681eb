//! Training-time categorical encoders

use crate::error::ScoringError;
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Categorical applicant fields that the model consumes as integer codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    HomeOwnership,
    LoanIntent,
    LoanGrade,
    DefaultOnFile,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 4] = [
        CategoricalField::HomeOwnership,
        CategoricalField::LoanIntent,
        CategoricalField::LoanGrade,
        CategoricalField::DefaultOnFile,
    ];

    /// Column name used by the training pipeline (and the encoders artifact)
    pub fn column_name(&self) -> &'static str {
        match self {
            CategoricalField::HomeOwnership => "person_home_ownership",
            CategoricalField::LoanIntent => "loan_intent",
            CategoricalField::LoanGrade => "loan_grade",
            CategoricalField::DefaultOnFile => "cb_person_default_on_file",
        }
    }

    /// Request field name, used in client-facing errors
    pub fn field_name(&self) -> &'static str {
        match self {
            CategoricalField::HomeOwnership => "home_ownership",
            CategoricalField::LoanIntent => "loan_intent",
            CategoricalField::LoanGrade => "loan_grade",
            CategoricalField::DefaultOnFile => "default_on_file",
        }
    }
}

/// Category-to-code table for a single field.
///
/// A value's code is its position in the class list exported by the
/// training label encoder.
#[derive(Debug, Clone)]
pub struct EncoderTable {
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl EncoderTable {
    pub fn from_classes(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            bail!("encoder has no classes");
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code as u32).is_some() {
                bail!("duplicate class '{}'", class);
            }
        }

        Ok(Self { classes, codes })
    }

    /// Look up a value exactly as given; no case folding or trimming
    pub fn code(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// The full set of per-field encoders, immutable after loading
#[derive(Debug, Clone)]
pub struct CategoryEncoders {
    tables: HashMap<CategoricalField, EncoderTable>,
}

impl CategoryEncoders {
    /// Build from class lists keyed by training column name.
    ///
    /// Every categorical field must be present; extra columns are ignored.
    pub fn from_class_lists(mut lists: HashMap<String, Vec<String>>) -> Result<Self> {
        let mut tables = HashMap::with_capacity(CategoricalField::ALL.len());

        for field in CategoricalField::ALL {
            let column = field.column_name();
            let classes = lists
                .remove(column)
                .with_context(|| format!("encoder for '{}' is missing", column))?;
            let table = EncoderTable::from_classes(classes)
                .with_context(|| format!("invalid encoder for '{}'", column))?;
            tables.insert(field, table);
        }

        Ok(Self { tables })
    }

    /// Load encoders from a JSON artifact
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read encoders from {:?}", path))?;
        let lists: HashMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse encoders from {:?}", path))?;

        let encoders = Self::from_class_lists(lists)?;

        for field in CategoricalField::ALL {
            info!(
                column = field.column_name(),
                classes = encoders.table(field).classes().len(),
                "Encoder loaded"
            );
        }

        Ok(encoders)
    }

    fn table(&self, field: CategoricalField) -> &EncoderTable {
        // from_class_lists guarantees one table per field
        &self.tables[&field]
    }

    /// Encode a categorical value, rejecting categories unseen in training
    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<u32, ScoringError> {
        let table = self.table(field);
        table
            .code(value)
            .ok_or_else(|| ScoringError::UnknownCategory {
                field: field.field_name(),
                value: value.to_string(),
                known: table.classes().to_vec(),
            })
    }

    /// Known classes for a field
    pub fn classes(&self, field: CategoricalField) -> &[String] {
        self.table(field).classes()
    }
}
