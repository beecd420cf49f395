// In crates/strategies/src/templates.rs

use crate::types::{DualMovingAverageSettings, MeanReversionRsiSettings, MomentumBreakoutSettings, TemplateSettings};
use core_types::Parameters;

/// A predefined strategy type with built-in default parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub default_parameters: Parameters,
    pub typical_trades_per_month: String,
}

impl StrategyTemplate {
    fn from_settings<T: TemplateSettings>() -> Self {
        Self {
            id: T::ID.to_string(),
            name: T::NAME.to_string(),
            description: T::DESCRIPTION.to_string(),
            default_parameters: T::default().parameters(),
            typical_trades_per_month: T::TYPICAL_TRADES_PER_MONTH.to_string(),
        }
    }
}

/// The per-template default parameter table.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<StrategyTemplate>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    /// The hardcoded catalog, used whenever the service's list is unavailable.
    pub fn builtin() -> Self {
        Self {
            templates: vec![
                StrategyTemplate::from_settings::<MomentumBreakoutSettings>(),
                StrategyTemplate::from_settings::<MeanReversionRsiSettings>(),
                StrategyTemplate::from_settings::<DualMovingAverageSettings>(),
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&StrategyTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrategyTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Default parameters for `strategy_type`.
    ///
    /// Unknown types resolve to an empty set; the backtest service decides
    /// which types are valid.
    pub fn default_parameters(&self, strategy_type: &str) -> Parameters {
        self.get(strategy_type)
            .map(|t| t.default_parameters.clone())
            .unwrap_or_default()
    }

    /// Overlays a template reported by the service.
    ///
    /// Reported parameters win over built-in ones, built-in parameters the
    /// service did not mention are kept. A template id the catalog does not
    /// know yet is appended.
    pub fn merge(&mut self, id: &str, name: &str, parameters: &Parameters) {
        match self.templates.iter_mut().find(|t| t.id == id) {
            Some(existing) => {
                existing
                    .default_parameters
                    .extend(parameters.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            None => self.templates.push(StrategyTemplate {
                id: id.to_string(),
                name: if name.trim().is_empty() { id.to_string() } else { name.to_string() },
                description: String::new(),
                default_parameters: parameters.clone(),
                typical_trades_per_month: String::new(),
            }),
        }
    }
}
