//! Country dataset adapters.
//!
//! Two on-disk layouts are understood:
//!
//! - the raw REST-countries export (`countries.json`), a JSON array of country
//!   objects with nested name data, and
//! - the compact borders file (`borders.json`), a JSON object keyed by `cca3`.
//!
//! [`CountryDataset`] normalizes either layout and serves as both the
//! [`GraphProvider`] and the [`CountryMetadataProvider`] for the engine.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::{CountryCode, Graph, GraphProvider};
use crate::resolver::{CountryMetadataProvider, CountryRecord};

/// Default filename for the country dataset.
const DATASET_FILENAME: &str = "countries.json";

/// Environment variable overriding the dataset location.
pub const DATA_ENV_VAR: &str = "LANDROUTE_DATA";

/// Country entry as stored in the compact borders layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactCountry {
    pub cca2: Option<String>,
    pub ccn3: Option<String>,
    pub cca3: Option<String>,
    pub cioc: Option<String>,
    pub borders: Vec<CountryCode>,
    pub names: Vec<String>,
}

impl CompactCountry {
    fn record(&self, code: &str) -> CountryRecord {
        CountryRecord {
            code: code.to_string(),
            cca2: self.cca2.clone(),
            ccn3: self.ccn3.clone(),
            cioc: self.cioc.clone(),
            names: self.names.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawCountry {
    name: Option<RawName>,
    cca2: Option<String>,
    ccn3: Option<String>,
    cca3: Option<String>,
    cioc: Option<String>,
    borders: Option<Vec<CountryCode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawName {
    common: Option<String>,
    official: Option<String>,
    native: Option<BTreeMap<String, NativeName>>,
    #[serde(rename = "nativeName")]
    native_name: Option<BTreeMap<String, NativeName>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct NativeName {
    common: Option<String>,
    official: Option<String>,
}

impl RawName {
    /// Common and official names first, then native names by language key.
    fn collect(&self) -> Vec<String> {
        let mut names = Vec::new();
        names.extend(self.common.clone());
        names.extend(self.official.clone());

        let natives = self.native.as_ref().or(self.native_name.as_ref());
        for native in natives.into_iter().flat_map(BTreeMap::values) {
            names.extend(native.common.clone());
            names.extend(native.official.clone());
        }
        names
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Raw(Vec<RawCountry>),
    Compact(BTreeMap<String, CompactCountry>),
}

/// In-memory country dataset keyed by canonical code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryDataset {
    countries: BTreeMap<CountryCode, CompactCountry>,
}

impl CountryDataset {
    /// Load a dataset from disk, detecting the raw or compact layout.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }

        let reader = BufReader::new(File::open(path)?);
        let file: DatasetFile = serde_json::from_reader(reader)?;
        let dataset = Self::from_file(file);
        info!(
            path = %path.display(),
            countries = dataset.len(),
            "loaded country dataset"
        );
        Ok(dataset)
    }

    /// Parse a dataset from a JSON string in either layout.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: DatasetFile = serde_json::from_str(json)?;
        Ok(Self::from_file(file))
    }

    /// Build a dataset from compact entries keyed by canonical code.
    pub fn from_compact(countries: BTreeMap<CountryCode, CompactCountry>) -> Self {
        let countries = countries
            .into_iter()
            .filter_map(|(key, mut country)| {
                let code = country
                    .cca3
                    .clone()
                    .filter(|code| !code.trim().is_empty())
                    .unwrap_or(key);
                if code.trim().is_empty() {
                    warn!("skipping compact country entry without a code");
                    return None;
                }
                country.cca3 = Some(code.clone());
                Some((code, country))
            })
            .collect();
        Self { countries }
    }

    fn from_file(file: DatasetFile) -> Self {
        match file {
            DatasetFile::Raw(raw) => Self::from_raw(raw),
            DatasetFile::Compact(compact) => Self::from_compact(compact),
        }
    }

    fn from_raw(raw: Vec<RawCountry>) -> Self {
        let mut countries = BTreeMap::new();
        let mut skipped = 0usize;

        for country in raw {
            let Some(code) = country.cca3.clone().filter(|code| !code.trim().is_empty()) else {
                skipped += 1;
                continue;
            };

            let names = country
                .name
                .as_ref()
                .map(RawName::collect)
                .unwrap_or_default();

            countries.insert(
                code.clone(),
                CompactCountry {
                    cca2: country.cca2,
                    ccn3: country.ccn3,
                    cca3: Some(code),
                    cioc: country.cioc,
                    borders: country.borders.unwrap_or_default(),
                    names,
                },
            );
        }

        if skipped > 0 {
            warn!(skipped, "ignored country entries without a cca3 code");
        }

        Self { countries }
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&CompactCountry> {
        self.countries.get(code)
    }

    /// Iterate countries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, &CompactCountry)> {
        self.countries.iter()
    }

    /// Build the adjacency graph, preserving each country's border order.
    pub fn graph(&self) -> Graph {
        let adjacency: HashMap<CountryCode, Vec<CountryCode>> = self
            .countries
            .iter()
            .map(|(code, country)| (code.clone(), country.borders.clone()))
            .collect();
        Graph::from_adjacency(adjacency)
    }
}

impl GraphProvider for CountryDataset {
    fn build_graph(&self) -> Result<Graph> {
        let graph = self.graph();
        debug!(countries = graph.len(), "built border graph");
        Ok(graph)
    }
}

impl CountryMetadataProvider for CountryDataset {
    fn countries(&self) -> Result<Vec<CountryRecord>> {
        Ok(self
            .countries
            .iter()
            .map(|(code, country)| country.record(code))
            .collect())
    }
}

/// Write the dataset in the compact borders layout.
///
/// Keys and each border list are sorted so the output is stable. The file is
/// written to a temporary sibling first and then moved into place.
pub fn write_borders(dataset: &CountryDataset, destination: &Path) -> Result<()> {
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let sorted: BTreeMap<&CountryCode, CompactCountry> = dataset
        .iter()
        .map(|(code, country)| {
            let mut country = country.clone();
            country.borders.sort();
            (code, country)
        })
        .collect();

    let parent = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut tmp, &sorted)?;
    tmp.write_all(b"\n")?;
    tmp.flush()?;
    tmp.persist(destination).map_err(|err| err.error)?;

    info!(
        path = %destination.display(),
        countries = sorted.len(),
        "wrote compact borders file"
    );
    Ok(())
}

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "landroute", "landroute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Locate the dataset file.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `LANDROUTE_DATA` environment variable.
/// 3. Platform-specific data directory.
///
/// A directory is expanded to `<dir>/countries.json`. The returned path is
/// guaranteed to exist.
pub fn resolve_dataset_path(target: Option<&Path>) -> Result<PathBuf> {
    let candidate = if let Some(explicit) = target {
        canonical_dataset_path(explicit)
    } else if let Some(env_path) = env::var_os(DATA_ENV_VAR) {
        canonical_dataset_path(Path::new(&env_path))
    } else {
        default_dataset_path()?
    };

    if candidate.exists() {
        Ok(candidate)
    } else {
        Err(Error::DatasetNotFound { path: candidate })
    }
}

/// Convenience wrapper: resolve the dataset path and load it.
pub fn load_dataset(target: Option<&Path>) -> Result<CountryDataset> {
    let path = resolve_dataset_path(target)?;
    CountryDataset::load(&path)
}

fn canonical_dataset_path(path: &Path) -> PathBuf {
    if path.is_dir() || path.extension().is_none() {
        return path.join(DATASET_FILENAME);
    }

    path.to_path_buf()
}
