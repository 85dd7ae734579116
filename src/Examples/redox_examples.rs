use crate::Pourbaix::diagram::compute_diagram;
use crate::Pourbaix::phase::PhaseCatalog;
use crate::Pourbaix::stability_grid::GridSpec;
use crate::Reactions::User_reactions::{ReactionList, RedoxTask};
use crate::Reactions::electrochem_features::extract_features;
use crate::Reactions::stoichiometry_balancer::balance_equation;
use crate::Thermodynamics::nernst::{NernstLine, hydrogen_line, oxygen_line};
use crate::Thermodynamics::reaction_thermo::{
    ReactionThermo, Temperature, ThermoPolicy, dg_temperature_sweep,
};
use crate::Thermodynamics::thermo_lookup::ThermoLibrary;
use crate::errors::RedoxResult;
use log::error;

pub fn redox_examples(task: usize) {
    if let Err(e) = run_example(task) {
        error!("example {} failed: {}", task, e);
    }
}

fn run_example(task: usize) -> RedoxResult<()> {
    match task {
        // balancing in every notation the parser accepts
        0 => {
            let equations = [
                "MnO4- + H+ + e- -> Mn+2 + H2O",
                "Cr2O7^{2-} + H^+ + Fe^{2+} → Cr^{3+} + Fe^{3+} + H2O",
                "C3H8 + O2 = CO2 + H2O",
                "Fe³⁺ + electron ⇌ Fe²⁺",
                "4H2 + 3O2 -> 2H2O + 2H2O2",
            ];
            for equation in equations {
                let balanced = balance_equation(equation)?;
                let features = extract_features(&balanced);
                println!(
                    "{}\n   {}   n = {}, m = {}",
                    equation,
                    balanced.equation(),
                    features.n,
                    features.m
                );
                for advisory in balanced.advisories() {
                    println!("   warning: {}", advisory);
                }
            }
        }
        // thermodynamics of a half-reaction from the built-in table
        1 => {
            let mut task = RedoxTask::with_options(
                "MnO4- + H+ + e- -> Mn+2 + H2O",
                Temperature::Celsius(25.0),
                ThermoPolicy::Lenient,
                0.01,
            );
            task.solve(&ThermoLibrary::builtin())?;
            task.pretty_print();
            let line = task.nernst_line()?;
            for (ph, e) in line.sample(0.0, 14.0, 8) {
                println!("pH = {:5.2}  E = {:.4} V", ph, e);
            }
        }
        // dH/dS entered directly and dG over a temperature range
        2 => {
            let summary =
                ReactionThermo::from_dh_ds(-285.8, -163.2, Temperature::Kelvin(298.15), 0, 0.01)?;
            summary.pretty_print();
            for (t_c, dg) in dg_temperature_sweep(-285.8, -163.2, -100.0, 500.0, 7) {
                println!("T = {:6.1} °C  dG = {:.2} kJ/mol", t_c, dg);
            }
        }
        // Nernst line with water stability limits
        3 => {
            let permanganate = NernstLine::new("MnO4-/Mn2+", 1.51, 5, 8, 298.15)?;
            let oxygen = oxygen_line(298.15)?;
            let hydrogen = hydrogen_line(298.15)?;
            for ph in [0.0, 3.5, 7.0, 10.5, 14.0] {
                println!(
                    "pH {:4.1}: MnO4-/Mn2+ {:.3} V, O2/H2O {:.3} V, H+/H2 {:.3} V",
                    ph,
                    permanganate.potential_at(ph),
                    oxygen.potential_at(ph),
                    hydrogen.potential_at(ph)
                );
            }
        }
        // iron Pourbaix diagram
        4 => {
            let catalog = PhaseCatalog::iron();
            catalog.pretty_print();
            let mut diagram = compute_diagram(
                &catalog.phases,
                Temperature::Celsius(25.0),
                &GridSpec::default(),
            )?;
            diagram.add_water_lines(100)?;
            diagram.pretty_print();
            for (ph, e) in [(0.0, 1.0), (2.0, 0.0), (7.0, 0.5), (7.0, -1.5), (13.0, -0.7)] {
                println!(
                    "pH {}, E {} V: {}",
                    ph,
                    e,
                    diagram.dominant_phase_at(ph, e).unwrap_or("-")
                );
            }
        }
        // strict thermo policy on a species without data
        5 => {
            let mut list = ReactionList::new();
            for policy in [ThermoPolicy::Lenient, ThermoPolicy::Strict] {
                list.add(RedoxTask::with_options(
                    "Ag+ + e- -> Ag",
                    Temperature::Celsius(25.0),
                    policy,
                    0.01,
                ));
                list.add(RedoxTask::with_options(
                    "Au+3 + e- -> Au",
                    Temperature::Celsius(25.0),
                    policy,
                    0.01,
                ));
            }
            let results = list.solve_all(&ThermoLibrary::builtin());
            for (task, result) in list.tasks.iter().zip(&results) {
                if let Err(e) = result {
                    println!("{:?} {}: {}", task.policy, task.equation, e);
                }
            }
            list.pretty_print();
        }
        _ => println!("no example with number {}", task),
    }
    Ok(())
}
