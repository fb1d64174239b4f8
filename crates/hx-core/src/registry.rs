//! The closed registry of recognized KPIs.
//!
//! KPI names are the function-object names written by the solver. Anything
//! not listed here is never resolved. The registry is built once and shared
//! read-only with the locator and the extractor.

use std::collections::HashSet;

use serde::Serialize;

use crate::{HxError, HxResult};

/// A monitored quantity written by an in-situ function object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiDefinition {
    pub name: String,
    /// Region folder used by multi-region output layouts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Axis label for charts.
    pub label: String,
}

impl KpiDefinition {
    pub fn new(name: &str, region: Option<&str>, label: &str) -> Self {
        Self {
            name: name.to_string(),
            region: region.map(str::to_string),
            label: label.to_string(),
        }
    }
}

/// A composite metric computed as `minuend - subtrahend`.
///
/// For full series the minuend's time grid is the reference and the
/// subtrahend is interpolated onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedMetric {
    pub name: String,
    pub minuend: String,
    pub subtrahend: String,
    pub title: String,
    pub label: String,
}

impl DerivedMetric {
    pub fn new(name: &str, minuend: &str, subtrahend: &str, title: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            minuend: minuend.to_string(),
            subtrahend: subtrahend.to_string(),
            title: title.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiRegistry {
    kpis: Vec<KpiDefinition>,
    derived: Vec<DerivedMetric>,
    columns: Vec<String>,
}

impl KpiRegistry {
    /// Build a registry and check it for consistency.
    pub fn new(
        kpis: Vec<KpiDefinition>,
        derived: Vec<DerivedMetric>,
        columns: Vec<String>,
    ) -> HxResult<Self> {
        let registry = Self {
            kpis,
            derived,
            columns,
        };
        registry.validate()?;
        Ok(registry)
    }

    /// The heat-exchanger monitor set.
    pub fn standard() -> Self {
        let kpis = vec![
            KpiDefinition::new("Tin_air", Some("air"), "T (K)"),
            KpiDefinition::new("Tout_air", Some("air"), "T (K)"),
            KpiDefinition::new("Pin_air", Some("air"), "p (Pa)"),
            KpiDefinition::new("Pout_air", Some("air"), "p (Pa)"),
            KpiDefinition::new("mdot_air_out", Some("air"), "sum(phi) (solver units)"),
            KpiDefinition::new("Tout_porous", Some("porous"), "T (K)"),
        ];
        let derived = vec![
            DerivedMetric::new(
                "DeltaT_air",
                "Tout_air",
                "Tin_air",
                "DeltaT_air = Tout - Tin",
                "DeltaT (K)",
            ),
            DerivedMetric::new(
                "DeltaP_air",
                "Pin_air",
                "Pout_air",
                "DeltaP_air = Pin - Pout",
                "DeltaP (Pa)",
            ),
        ];
        let columns = [
            "Tin_air",
            "Tout_air",
            "DeltaT_air",
            "Pin_air",
            "Pout_air",
            "DeltaP_air",
            "mdot_air_out",
            "Tout_porous",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();

        Self {
            kpis,
            derived,
            columns,
        }
    }

    pub fn validate(&self) -> HxResult<()> {
        let mut names = HashSet::new();
        let all_names = self
            .kpis
            .iter()
            .map(|k| k.name.as_str())
            .chain(self.derived.iter().map(|d| d.name.as_str()));
        for name in all_names {
            if !names.insert(name) {
                return Err(HxError::DuplicateMetric {
                    name: name.to_string(),
                });
            }
        }

        for metric in &self.derived {
            for operand in [&metric.minuend, &metric.subtrahend] {
                if self.kpi(operand).is_none() {
                    return Err(HxError::UnknownOperand {
                        derived: metric.name.clone(),
                        operand: operand.clone(),
                    });
                }
            }
        }

        for column in &self.columns {
            if !names.contains(column.as_str()) {
                return Err(HxError::UnknownColumn {
                    column: column.clone(),
                });
            }
        }
        for name in names {
            if !self.columns.iter().any(|c| c == name) {
                return Err(HxError::MissingColumn {
                    name: name.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn kpis(&self) -> &[KpiDefinition] {
        &self.kpis
    }

    pub fn derived(&self) -> &[DerivedMetric] {
        &self.derived
    }

    /// Metric names in summary column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn kpi(&self, name: &str) -> Option<&KpiDefinition> {
        self.kpis.iter().find(|k| k.name == name)
    }

    pub fn derived_metric(&self, name: &str) -> Option<&DerivedMetric> {
        self.derived.iter().find(|d| d.name == name)
    }

    pub fn region_of(&self, name: &str) -> Option<&str> {
        self.kpi(name).and_then(|k| k.region.as_deref())
    }

    /// Axis label for any registered metric.
    pub fn label_of(&self, name: &str) -> Option<&str> {
        self.kpi(name)
            .map(|k| k.label.as_str())
            .or_else(|| self.derived_metric(name).map(|d| d.label.as_str()))
    }
}

impl Default for KpiRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
