// src/config/mod.rs

//! Named datasets: which files to merge and which filename fields to attach.
//!
//! Built-in presets cover the recorded runs. A YAML manifest can add more or
//! replace a preset by name:
//!
//! ```yaml
//! datasets:
//!   - name: burst-h1
//!     glob: "*,burst,*p=h1*.csv"
//!     fields:
//!       provider: 0
//!       proto: p
//!   - name: pair
//!     providers: [alchemy, quicknode]
//!     suffix: ",limits,b=500,c=100,p=h2,i=2.csv"
//!     raw_params: true
//! ```

pub mod presets;

use indexmap::IndexMap;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::params::ParamRef;
use crate::process::{Attach, FieldSpec};
use crate::resolve::Selection;

/// A named file selection plus the filename fields to attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub selection: Selection,
    pub attach: Attach,
}

/// Manifest entry, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetDef {
    name: String,
    #[serde(default)]
    files: Option<Vec<String>>,
    #[serde(default)]
    providers: Option<Vec<String>>,
    #[serde(default)]
    suffix: Option<String>,
    #[serde(default)]
    glob: Option<String>,
    #[serde(default)]
    fields: Option<IndexMap<String, ParamRef>>,
    #[serde(default)]
    raw_params: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    datasets: Vec<DatasetDef>,
}

impl TryFrom<DatasetDef> for Dataset {
    type Error = PipelineError;

    fn try_from(def: DatasetDef) -> Result<Self> {
        let invalid = |reason: &str| PipelineError::InvalidDataset {
            name: def.name.clone(),
            reason: reason.to_string(),
        };

        let selection = match (&def.files, &def.providers, &def.glob) {
            (Some(files), None, None) => {
                if def.suffix.is_some() {
                    return Err(invalid("`suffix` only applies to `providers`"));
                }
                Selection::Explicit(files.clone())
            }
            (None, Some(providers), None) => {
                let suffix = def
                    .suffix
                    .as_deref()
                    .ok_or_else(|| invalid("`providers` needs a `suffix`"))?;
                Selection::providers(providers.as_slice(), suffix)
            }
            (None, None, Some(pattern)) => {
                if def.suffix.is_some() {
                    return Err(invalid("`suffix` only applies to `providers`"));
                }
                Selection::Glob(pattern.clone())
            }
            _ => {
                return Err(invalid(
                    "exactly one of `files`, `providers` or `glob` is required",
                ))
            }
        };

        let attach = match (def.raw_params, &def.fields) {
            (true, Some(_)) => return Err(invalid("`fields` and `raw_params` are exclusive")),
            (true, None) => Attach::RawParams,
            (false, Some(fields)) => Attach::Projection(
                fields
                    .iter()
                    .map(|(name, param)| FieldSpec::new(name, param.clone()))
                    .collect(),
            ),
            (false, None) => Attach::default_projection(),
        };

        Ok(Dataset {
            name: def.name,
            selection,
            attach,
        })
    }
}

/// Known datasets, in definition order.
#[derive(Debug, Clone)]
pub struct Catalogue {
    datasets: IndexMap<String, Dataset>,
}

impl Catalogue {
    pub fn builtin() -> Self {
        let mut cat = Self {
            datasets: IndexMap::new(),
        };
        for ds in presets::builtin() {
            cat.insert(ds);
        }
        cat
    }

    /// Add or replace a dataset by name.
    pub fn insert(&mut self, dataset: Dataset) {
        if self.datasets.contains_key(&dataset.name) {
            debug!(name = %dataset.name, "replacing dataset");
        }
        self.datasets.insert(dataset.name.clone(), dataset);
    }

    /// Merge the datasets of a YAML manifest text.
    pub fn extend_from_yaml(&mut self, path: &Path, text: &str) -> Result<()> {
        let manifest: Manifest =
            serde_yaml::from_str(text).map_err(|source| PipelineError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;
        let count = manifest.datasets.len();
        for def in manifest.datasets {
            self.insert(Dataset::try_from(def)?);
        }
        info!(path = %path.display(), count, "loaded dataset manifest");
        Ok(())
    }

    pub fn load_manifest(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        self.extend_from_yaml(path, &text)
    }

    pub fn get(&self, name: &str) -> Result<&Dataset> {
        self.datasets
            .get(name)
            .ok_or_else(|| PipelineError::UnknownDataset(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.values()
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Result<Catalogue> {
        let mut cat = Catalogue::builtin();
        cat.extend_from_yaml(Path::new("datasets.yaml"), text)?;
        Ok(cat)
    }

    #[test]
    fn builtin_presets() {
        let cat = Catalogue::builtin();
        let names: Vec<_> = cat.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["protocols", "limits", "burst", "chainstack-concurrency"]
        );

        let protocols = cat.get("protocols").unwrap();
        assert_eq!(
            protocols.selection,
            Selection::Explicit(vec![
                "alchemy,b=1000,c=100,p=h2,i=3.csv".into(),
                "chainstack,b=1000,c=100,p=h2,i=3.csv".into(),
                "quicknode,b=1000,c=100,p=h2,i=3.csv".into(),
            ])
        );

        let conc = cat.get("chainstack-concurrency").unwrap();
        match &conc.selection {
            Selection::Explicit(files) => {
                assert_eq!(files.len(), 5);
                assert_eq!(files[0], "chainstack,concurrency,limits,b=98,c=98.csv");
                assert_eq!(files[4], "chainstack,concurrency,limits,b=102,c=102.csv");
            }
            other => panic!("unexpected selection {:?}", other),
        }

        assert_eq!(
            cat.get("burst").unwrap().selection,
            Selection::Glob("*,burst,*.csv".into())
        );
    }

    #[test]
    fn unknown_dataset() {
        let err = Catalogue::builtin().get("nope").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownDataset(ref n) if n == "nope"));
    }

    #[test]
    fn manifest_adds_and_overrides() -> Result<()> {
        let cat = yaml(
            r#"
datasets:
  - name: burst
    glob: "*,burst,*p=h1*.csv"
    fields:
      provider: 0
      proto: p
  - name: pair
    providers: [alchemy, quicknode]
    suffix: ",limits.csv"
    raw_params: true
  - name: fixed
    files: ["x.csv"]
"#,
        )?;

        let burst = cat.get("burst")?;
        assert_eq!(burst.selection, Selection::Glob("*,burst,*p=h1*.csv".into()));
        assert_eq!(
            burst.attach,
            Attach::Projection(vec![
                FieldSpec::new("provider", ParamRef::Position(0)),
                FieldSpec::new("proto", ParamRef::key("p")),
            ])
        );

        let pair = cat.get("pair")?;
        assert_eq!(pair.attach, Attach::RawParams);
        assert_eq!(
            pair.selection,
            Selection::Explicit(vec!["alchemy,limits.csv".into(), "quicknode,limits.csv".into()])
        );

        assert_eq!(cat.get("fixed")?.attach, Attach::default_projection());
        assert_eq!(cat.iter().count(), 6);
        Ok(())
    }

    #[test]
    fn manifest_rejects_ambiguous_selection() {
        let err = yaml(
            r#"
datasets:
  - name: both
    files: [a.csv]
    glob: "*.csv"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDataset { ref name, .. } if name == "both"));

        let err = yaml("datasets:\n  - name: p\n    providers: [a]\n").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDataset { .. }));
    }

    #[test]
    fn manifest_syntax_error() {
        let err = yaml("datasets: [ {name: x, colour: red} ]").unwrap_err();
        assert!(matches!(err, PipelineError::Manifest { .. }));
    }
}
