//! User-level reaction tasks.
//!
//! [`RedoxTask`] collects everything known about one reaction entered by the user: the balanced
//! equation, the electrochemical features (n, m), the thermodynamic summary, the Nernst line and
//! the advisories raised on the way. [`ReactionList`] keeps the reactions of a session and
//! solves them together.
use crate::Reactions::electrochem_features::{ElectrochemFeatures, extract_features};
use crate::Reactions::stoichiometry_balancer::{BalancedReaction, balance_equation};
use crate::Thermodynamics::nernst::NernstLine;
use crate::Thermodynamics::reaction_thermo::{
    ReactionThermo, Temperature, ThermoPolicy, dg_temperature_sweep,
};
use crate::Thermodynamics::thermo_lookup::{ThermoLibrary, ThermoLookup};
use crate::Utils::load_from_file::load_thermo_from_file;
use crate::errors::{Advisory, RedoxError, RedoxResult};
use crate::settings::with_settings;
use log::{info, warn};
use prettytable::{Table, row};
use rayon::prelude::*;

/// built-in table merged with the document configured in the settings, if any
pub fn configured_thermo_library() -> RedoxResult<ThermoLibrary> {
    let mut library = ThermoLibrary::builtin();
    if let Some(path) = with_settings(|manager| manager.config().thermo_library.clone()) {
        let user = load_thermo_from_file(&path)?;
        library.merge(&user);
    }
    Ok(library)
}

/// structure to store one user reaction and everything calculated for it
#[derive(Debug, Clone)]
pub struct RedoxTask {
    pub equation: String,
    pub temperature: Temperature,
    pub policy: ThermoPolicy,
    /// kJ/mol
    pub tolerance: f64,
    pub balanced: Option<BalancedReaction>,
    pub features: Option<ElectrochemFeatures>,
    pub thermo: Option<ReactionThermo>,
}

impl RedoxTask {
    /// task with temperature, policy and tolerance taken from the settings
    pub fn new(equation: &str) -> Self {
        let (temperature, policy, tolerance) = with_settings(|manager| {
            let config = manager.config();
            (
                config.temperature(),
                config.thermo_policy,
                config.spontaneity_tolerance_kj,
            )
        });
        Self::with_options(equation, temperature, policy, tolerance)
    }

    pub fn with_options(
        equation: &str,
        temperature: Temperature,
        policy: ThermoPolicy,
        tolerance: f64,
    ) -> Self {
        Self {
            equation: equation.to_string(),
            temperature,
            policy,
            tolerance,
            balanced: None,
            features: None,
            thermo: None,
        }
    }

    /// a new temperature invalidates the thermo summary, dH and dS are kept
    pub fn set_temperature(&mut self, temperature: Temperature) -> RedoxResult<()> {
        temperature.to_kelvin()?;
        self.temperature = temperature;
        if let Some(thermo) = &self.thermo {
            self.thermo = Some(thermo.at_temperature(temperature, self.tolerance)?);
        }
        Ok(())
    }

    /////////////////////////////////BALANCING///////////////////////////////////////////
    pub fn balance(&mut self) -> RedoxResult<&BalancedReaction> {
        let balanced = balance_equation(&self.equation)?;
        self.features = Some(extract_features(&balanced));
        Ok(self.balanced.insert(balanced))
    }

    fn balanced_or_balance(&mut self) -> RedoxResult<BalancedReaction> {
        match &self.balanced {
            Some(balanced) => Ok(balanced.clone()),
            None => Ok(self.balance()?.clone()),
        }
    }

    pub fn balanced_equation(&self) -> Option<String> {
        self.balanced.as_ref().map(BalancedReaction::equation)
    }

    /// (species id, molar mass g/mol) of every species of the balanced reaction
    pub fn molar_masses(&self) -> Vec<(String, f64)> {
        self.balanced
            .iter()
            .flat_map(|b| b.reactants.iter().chain(b.products.iter()))
            .map(|(species, _)| (species.id.clone(), species.molar_mass()))
            .collect()
    }

    /////////////////////////////////THERMODYNAMICS///////////////////////////////////////////
    /// dH and dS from species records
    pub fn calculate_thermo(&mut self, lookup: &dyn ThermoLookup) -> RedoxResult<&ReactionThermo> {
        let balanced = self.balanced_or_balance()?;
        let thermo = ReactionThermo::from_reaction(
            &balanced,
            self.temperature,
            lookup,
            self.policy,
            self.tolerance,
        )?;
        Ok(self.thermo.insert(thermo))
    }

    /// dH (kJ/mol) and dS (J/mol/K) entered directly; n comes from the balanced reaction
    /// when there is one
    pub fn set_dh_ds(&mut self, dh: f64, ds: f64) -> RedoxResult<&ReactionThermo> {
        let n = self.features.map(|f| f.n).unwrap_or(0);
        let thermo = ReactionThermo::from_dh_ds(dh, ds, self.temperature, n, self.tolerance)?;
        Ok(self.thermo.insert(thermo))
    }

    pub fn nernst_line(&self) -> RedoxResult<NernstLine> {
        let (thermo, features) = match (&self.thermo, &self.features) {
            (Some(thermo), Some(features)) => (thermo, features),
            _ => {
                return Err(RedoxError::NoElectronTransfer(format!(
                    "'{}' has not been balanced and evaluated yet",
                    self.equation
                )));
            }
        };
        let label = self.balanced_equation().unwrap_or_else(|| self.equation.clone());
        NernstLine::from_reaction(&label, thermo, features)
    }

    /// dG(T) over a Celsius range, None before the thermo summary exists
    pub fn dg_sweep(&self, t_min_c: f64, t_max_c: f64, points: usize) -> Option<Vec<(f64, f64)>> {
        self.thermo
            .as_ref()
            .map(|t| dg_temperature_sweep(t.dh, t.ds, t_min_c, t_max_c, points))
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        if let Some(balanced) = &self.balanced {
            advisories.extend(balanced.advisories());
        }
        if let Some(thermo) = &self.thermo {
            advisories.extend(thermo.advisories());
        }
        advisories
    }

    /// balance and evaluate
    pub fn solve(&mut self, lookup: &dyn ThermoLookup) -> RedoxResult<()> {
        self.balance()?;
        self.calculate_thermo(lookup)?;
        for advisory in self.advisories() {
            warn!("{}: {}", self.equation, advisory);
        }
        Ok(())
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(row!["input", self.equation]);
        if let Some(equation) = self.balanced_equation() {
            table.add_row(row!["balanced", equation]);
        }
        if let Some(features) = &self.features {
            table.add_row(row!["electrons n", features.n]);
            table.add_row(row!["protons m", features.m]);
        }
        table.printstd();
        if let Some(thermo) = &self.thermo {
            thermo.pretty_print();
        } else {
            for advisory in self.advisories() {
                println!("warning: {}", advisory);
            }
        }
    }
}

/// reactions registered during a session
#[derive(Debug, Clone, Default)]
pub struct ReactionList {
    pub tasks: Vec<RedoxTask>,
}

impl ReactionList {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn from_equations(equations: &[String]) -> Self {
        Self {
            tasks: equations.iter().map(|eq| RedoxTask::new(eq)).collect(),
        }
    }

    pub fn add(&mut self, task: RedoxTask) {
        self.tasks.push(task);
    }

    pub fn remove(&mut self, index: usize) -> Option<RedoxTask> {
        (index < self.tasks.len()).then(|| self.tasks.remove(index))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// solves every task in parallel; results are in task order
    pub fn solve_all(&mut self, lookup: &dyn ThermoLookup) -> Vec<RedoxResult<()>> {
        let results: Vec<RedoxResult<()>> = self
            .tasks
            .par_iter_mut()
            .map(|task| task.solve(lookup))
            .collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(
            "solved {} reactions, {} failed",
            results.len() - failed,
            failed
        );
        results
    }

    /// solves only the tasks without a thermo summary, returns (task index, result)
    pub fn solve_pending(&mut self, lookup: &dyn ThermoLookup) -> Vec<(usize, RedoxResult<()>)> {
        self.tasks
            .par_iter_mut()
            .enumerate()
            .filter(|(_, task)| task.thermo.is_none())
            .map(|(index, task)| (index, task.solve(lookup)))
            .collect()
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(row!["#", "reaction", "n", "dG, kJ/mol", "E0, V", "spontaneity"]);
        for (i, task) in self.tasks.iter().enumerate() {
            let equation = task
                .balanced_equation()
                .unwrap_or_else(|| task.equation.clone());
            let n = task
                .features
                .map(|f| f.n.to_string())
                .unwrap_or_default();
            let (dg, e0, spontaneity) = match &task.thermo {
                Some(t) => (
                    format!("{:.2}", t.dg),
                    t.e0.map(|e| format!("{:.4}", e)).unwrap_or_default(),
                    t.spontaneity.to_string(),
                ),
                None => (String::new(), String::new(), "not evaluated".to_string()),
            };
            table.add_row(row![i + 1, equation, n, dg, e0, spontaneity]);
        }
        table.printstd();
    }
}
