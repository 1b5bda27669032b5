// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// PyO3 bindings for the redaction engine

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::redaction::{
    restore, Entity, EntityModel, FilterOverrides, FilterSpec, Mapping, RedactionConfig,
    RedactionError, RedactionSettings, Redactor, Result,
};

impl From<RedactionError> for PyErr {
    fn from(err: RedactionError) -> Self {
        PyValueError::new_err(format!("{}: {}", err.kind(), err))
    }
}

/// Python callable used as the NER model
///
/// Called with the document text; must return a list of
/// `(text, tag, confidence)` tuples. An exception fails the redaction call.
struct PyEntityModel {
    callable: Py<PyAny>,
}

impl EntityModel for PyEntityModel {
    fn detect_entities(&self, text: &str) -> Result<Vec<Entity>> {
        let detected: PyResult<Vec<(String, String, f32)>> = Python::attach(|py| {
            let result = self.callable.bind(py).call1((text,))?;
            Ok(result.extract()?)
        });

        let entities = detected.map_err(|e| RedactionError::Model(e.to_string()))?;
        Ok(entities
            .into_iter()
            .map(|(text, tag, confidence)| Entity::new(text, tag, confidence))
            .collect())
    }
}

/// Redactor exposed to Python
///
/// # Example (Python)
/// ```python
/// from pii_redaction import PIIRedactorRust
///
/// redactor = PIIRedactorRust({"filters": {"people_filter": None}})
/// result = redactor.filter("Email user@example.com")
/// print(result["output"])   # "Email [EMAIL_1]"
///
/// restored = redactor.restore("Wrote to [EMAIL_1]", result["mapping"])
/// print(restored["output"]) # "Wrote to user@example.com"
/// ```
#[pyclass]
pub struct PIIRedactorRust {
    redactor: Redactor,
}

#[pymethods]
impl PIIRedactorRust {
    /// Create a redactor
    ///
    /// # Configuration Keys
    /// * `min_confidence_score` (float): Default threshold for NER filters
    /// * `filters` (dict): Slot key (e.g. `email_filter`) to filter dict, or `None` to disable
    /// * `custom_filters` (list[dict]): Filters applied after the built-in slots
    /// * `model` (callable): `text -> list[(text, tag, confidence)]`
    ///
    /// Filter dicts carry `kind` (`"regex"` or `"ner"`), `label`, and either
    /// `patterns` (list[str]) or `tag` plus an optional `min_confidence_score`.
    #[new]
    #[pyo3(signature = (config_dict=None))]
    pub fn new(config_dict: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config_dict {
            Some(dict) => config_from_py_dict(dict)?,
            None => RedactionConfig::default(),
        };

        Ok(Self {
            redactor: Redactor::new(config),
        })
    }

    /// Detect sensitive values; returns the token -> value mapping
    pub fn scan<'py>(&self, py: Python<'py>, text: &str) -> PyResult<Bound<'py, PyDict>> {
        let result = self.redactor.scan(text, &FilterOverrides::new(), &[])?;
        mapping_to_py(py, &result.mapping)
    }

    /// Redact text; returns `{"input", "output", "mapping"}`
    pub fn filter<'py>(&self, py: Python<'py>, text: &str) -> PyResult<Bound<'py, PyDict>> {
        let result = self.redactor.filter(text, &FilterOverrides::new(), &[])?;

        let dict = PyDict::new(py);
        dict.set_item("input", result.input)?;
        dict.set_item("output", result.output)?;
        dict.set_item("mapping", mapping_to_py(py, &result.mapping)?)?;
        Ok(dict)
    }

    /// Redact several messages with shared tokens; returns
    /// `{"mapping", "items": [{"input", "output", "mapping"}]}`
    pub fn filter_all<'py>(
        &self,
        py: Python<'py>,
        messages: Vec<String>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let result = self
            .redactor
            .filter_all(&messages, &FilterOverrides::new(), &[])?;

        let items = PyList::empty(py);
        for item in result.items {
            let item_dict = PyDict::new(py);
            item_dict.set_item("input", item.input)?;
            item_dict.set_item("output", item.output)?;
            item_dict.set_item("mapping", mapping_to_py(py, &item.mapping)?)?;
            items.append(item_dict)?;
        }

        let dict = PyDict::new(py);
        dict.set_item("mapping", mapping_to_py(py, &result.mapping)?)?;
        dict.set_item("items", items)?;
        Ok(dict)
    }

    /// Restore placeholders; returns `{"output", "restored", "unrestored"}`
    pub fn restore<'py>(
        &self,
        py: Python<'py>,
        text: &str,
        mapping: &Bound<'py, PyDict>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let mapping = mapping_from_py(mapping)?;
        let result = restore(text, &mapping);

        let dict = PyDict::new(py);
        dict.set_item("output", result.output)?;
        dict.set_item("restored", result.restored)?;
        dict.set_item("unrestored", result.unrestored)?;
        Ok(dict)
    }
}

fn mapping_to_py<'py>(py: Python<'py>, mapping: &Mapping) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for (token, value) in mapping.iter() {
        dict.set_item(token, value)?;
    }
    Ok(dict)
}

fn mapping_from_py(dict: &Bound<'_, PyDict>) -> PyResult<Mapping> {
    let mut entries = Vec::with_capacity(dict.len());
    for (token, value) in dict.iter() {
        let token: String = token.extract()?;
        let value: String = value.extract()?;
        entries.push((token, value));
    }
    Ok(entries.into_iter().collect())
}

/// Extract configuration from a Python dict
fn config_from_py_dict(dict: &Bound<'_, PyDict>) -> PyResult<RedactionConfig> {
    let mut settings = RedactionSettings::default();

    if let Some(value) = dict.get_item("min_confidence_score")? {
        settings.min_confidence_score = Some(value.extract()?);
    }

    if let Some(value) = dict.get_item("filters")? {
        let filters = value
            .cast::<PyDict>()
            .map_err(|_| PyValueError::new_err("'filters' must be a dict"))?;
        for (key, spec) in filters.iter() {
            let key: String = key.extract()?;
            let spec = if spec.is_none() {
                None
            } else {
                Some(filter_spec_from_py(&spec)?)
            };
            settings.filters.insert(key, spec);
        }
    }

    if let Some(value) = dict.get_item("custom_filters")? {
        let list = value
            .cast::<PyList>()
            .map_err(|_| PyValueError::new_err("'custom_filters' must be a list"))?;
        for item in list.iter() {
            settings.custom_filters.push(filter_spec_from_py(&item)?);
        }
    }

    let mut config = RedactionConfig::from_settings(settings)?;

    if let Some(model) = dict.get_item("model")? {
        if !model.is_none() {
            if !model.is_callable() {
                return Err(PyValueError::new_err("'model' must be callable"));
            }
            config = config.with_model(PyEntityModel {
                callable: model.unbind(),
            });
        }
    }

    Ok(config)
}

/// Anything other than a filter dict is an unsupported filter
fn filter_spec_from_py(value: &Bound<'_, PyAny>) -> PyResult<FilterSpec> {
    let Ok(dict) = value.cast::<PyDict>() else {
        let type_name = value
            .get_type()
            .name()
            .map(|name| name.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        return Err(RedactionError::UnsupportedFilter(type_name).into());
    };

    let kind: String = match dict.get_item("kind")? {
        Some(kind) => kind.extract()?,
        None => return Err(RedactionError::UnsupportedFilter("dict without 'kind'".into()).into()),
    };
    let label: String = match dict.get_item("label")? {
        Some(label) if !label.is_none() => label.extract()?,
        _ => String::new(),
    };
    let patterns: Vec<String> = match dict.get_item("patterns")? {
        Some(patterns) => patterns.extract()?,
        None => Vec::new(),
    };
    let tag: Option<String> = match dict.get_item("tag")? {
        Some(tag) => tag.extract()?,
        None => None,
    };
    let min_confidence_score: Option<f32> = match dict.get_item("min_confidence_score")? {
        Some(score) => score.extract()?,
        None => None,
    };

    Ok(FilterSpec {
        kind,
        label,
        patterns,
        tag,
        min_confidence_score,
    })
}

/// Python module: pii_redaction
#[pymodule]
fn pii_redaction(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PIIRedactorRust>()?;

    // Module metadata
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add(
        "__doc__",
        "Reversible PII redaction with placeholder tokens",
    )?;

    Ok(())
}
