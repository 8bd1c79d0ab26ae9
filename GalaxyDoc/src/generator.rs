//! Generation runs and output conformance checks

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::bundle::locate_bundle;
use crate::config::GeneratorConfig;
use crate::document::{DocumentModel, GenerationMode};
use crate::emit::emit_records;
use crate::error::Result;
use crate::formats::{RecordKind, encode};
use crate::template::load_template;

/// Everything a generation run needs
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Directory holding the two templates (and optionally `galaxydoc.toml`)
    pub template_dir: PathBuf,
    /// Directory the records are written into
    pub output_dir: PathBuf,
    /// `file:<path>` or bare path of a bundle to depend on
    pub locator: Option<String>,
    pub config: GeneratorConfig,
}

impl GenerateRequest {
    #[must_use]
    pub fn new(template_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            output_dir: output_dir.into(),
            locator: None,
            config: GeneratorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }
}

/// One record written by a run
#[derive(Debug, Clone, Serialize)]
pub struct WrittenRecord {
    pub kind: RecordKind,
    pub path: PathBuf,
    pub size: usize,
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub title: String,
    /// Dependency id of the bundle, in bundle mode
    pub bundle: Option<String>,
    pub dependencies: Vec<String>,
    pub records: Vec<WrittenRecord>,
}

/// Generate `DocumentHeader` and `DocumentInfo` from templates
///
/// Nothing is written unless both records encode successfully, and the two
/// files are committed together (see [`emit_records`]).
///
/// # Errors
///
/// Returns the first error of any stage: template loading or merging,
/// bundle resolution, model validation, encoding, or emission.
pub fn generate(request: &GenerateRequest) -> Result<GenerationReport> {
    let settings = &request.config;

    tracing::info!("Loading templates from {}", request.template_dir.display());
    let mut template = load_template(request.template_dir.join(&settings.templates.header))?;
    template.merge(load_template(request.template_dir.join(&settings.templates.info))?)?;

    let mode = match &request.locator {
        Some(locator) => {
            let bundle = locate_bundle(locator, &settings.generation.base_dir)?;
            tracing::info!("Generating for bundle {}", bundle);
            GenerationMode::Bundle(bundle)
        }
        None => {
            tracing::info!("Generating standalone records");
            GenerationMode::Standalone
        }
    };

    let model = DocumentModel::from_template(&template, mode, &settings.model_options())?;

    let records = RecordKind::ALL
        .iter()
        .map(|&kind| encode(&model, kind))
        .collect::<Result<Vec<_>>>()?;

    let paths = emit_records(&request.output_dir, &records)?;

    Ok(GenerationReport {
        title: model.title.clone(),
        bundle: model.mode.bundle().map(|b| b.dependency_id()),
        dependencies: model.dependencies.iter().map(|d| d.id.clone()).collect(),
        records: records
            .iter()
            .zip(paths)
            .map(|(record, path)| WrittenRecord {
                kind: record.kind(),
                path,
                size: record.len(),
            })
            .collect(),
    })
}

/// How a generated record diverges from its baseline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The file is absent from one side
    Missing { kind: RecordKind, path: PathBuf },
    /// Both files exist but differ, first at `offset`
    Differs {
        kind: RecordKind,
        offset: usize,
        generated_len: usize,
        expected_len: usize,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { kind, path } => write!(f, "{kind}: missing {}", path.display()),
            Self::Differs {
                kind,
                offset,
                generated_len,
                expected_len,
            } => write!(
                f,
                "{kind}: differs at byte {offset:#x} (generated {generated_len} bytes, expected {expected_len})"
            ),
        }
    }
}

/// Offset of the first differing byte, `None` when identical
///
/// When one input is a prefix of the other, the offset is the shorter length.
#[must_use]
pub fn compare_bytes(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

/// Compare both records in `generated_dir` against `expected_dir`
///
/// # Errors
///
/// Returns [`Error::Io`] when a present file cannot be read.
///
/// [`Error::Io`]: crate::Error::Io
pub fn compare_outputs<P: AsRef<Path>, Q: AsRef<Path>>(
    generated_dir: P,
    expected_dir: Q,
) -> Result<Vec<Mismatch>> {
    let mut mismatches = Vec::new();

    for kind in RecordKind::ALL {
        let generated_path = generated_dir.as_ref().join(kind.file_name());
        let expected_path = expected_dir.as_ref().join(kind.file_name());

        let Some(generated) = read_if_exists(&generated_path)? else {
            mismatches.push(Mismatch::Missing { kind, path: generated_path });
            continue;
        };
        let Some(expected) = read_if_exists(&expected_path)? else {
            mismatches.push(Mismatch::Missing { kind, path: expected_path });
            continue;
        };

        if let Some(offset) = compare_bytes(&generated, &expected) {
            tracing::debug!("{} differs at offset {}", kind, offset);
            mismatches.push(Mismatch::Differs {
                kind,
                offset,
                generated_len: generated.len(),
                expected_len: expected.len(),
            });
        }
    }

    Ok(mismatches)
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    if path.is_file() {
        Ok(Some(std::fs::read(path)?))
    } else {
        Ok(None)
    }
}
