use super::cli_main::{get_user_input, prompt, prompt_parse};
use crate::Pourbaix::diagram::compute_diagram;
use crate::Pourbaix::phase::PhaseCatalog;
use crate::Reactions::User_reactions::{ReactionList, RedoxTask, configured_thermo_library};
use crate::Thermodynamics::reaction_thermo::{Temperature, ThermoPolicy};
use crate::Utils::load_from_file::{load_phases_from_file, load_reaction_list};
use crate::settings::{with_settings, with_settings_mut};
use log::error;
use std::fs;
use std::io::{self, Write};

fn show_menu(title: &str, options: &[&str]) {
    println!("\n=== {} ===", title);
    for (i, option) in options.iter().enumerate() {
        println!("\x1b[33m{}. {}\x1b[0m", i + 1, option);
    }
    println!("\x1b[33m0. Back to main menu\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

/// 1-based reaction number typed by the user
fn pick_task(list: &mut ReactionList) -> Option<&mut RedoxTask> {
    if list.is_empty() {
        println!("No reactions yet");
        return None;
    }
    let index: usize = prompt_parse(&format!("Reaction number (1..{}): ", list.len()))?;
    if index == 0 || index > list.len() {
        println!("There is no reaction {} (1..{})", index, list.len());
        return None;
    }
    list.tasks.get_mut(index - 1)
}

fn solve_session(list: &mut ReactionList) {
    let library = match configured_thermo_library() {
        Ok(library) => library,
        Err(e) => {
            error!("cannot load thermo library: {}", e);
            return;
        }
    };
    for (index, result) in list.solve_pending(&library) {
        if let Err(e) = result {
            println!("\x1b[31m{}: {}\x1b[0m", list.tasks[index].equation, e);
        }
    }
    list.pretty_print();
}

pub fn reaction_menu(list: &mut ReactionList) {
    loop {
        show_menu(
            "Reactions",
            &[
                "Add reaction",
                "Load reactions from task file",
                "Show details of a reaction",
                "Enter dH and dS of a reaction",
                "Change temperature of a reaction",
                "Nernst line of a reaction",
                "dG over temperature",
                "Remove reaction",
            ],
        );
        match get_user_input().trim() {
            "1" => {
                let equation = prompt("Reaction: ");
                if !equation.is_empty() {
                    list.add(RedoxTask::new(&equation));
                    solve_session(list);
                }
            }
            "2" => {
                let file = prompt("Task file: ");
                match load_reaction_list(&file) {
                    Ok(equations) => {
                        for equation in equations {
                            list.add(RedoxTask::new(&equation));
                        }
                        solve_session(list);
                    }
                    Err(e) => println!("\x1b[31m{}\x1b[0m", e),
                }
            }
            "3" => {
                if let Some(task) = pick_task(list) {
                    task.pretty_print();
                }
            }
            "4" => {
                if let Some(task) = pick_task(list) {
                    let dh: Option<f64> = prompt_parse("dH, kJ/mol: ");
                    let ds: Option<f64> = prompt_parse("dS, J/mol/K: ");
                    if let (Some(dh), Some(ds)) = (dh, ds) {
                        match task.set_dh_ds(dh, ds) {
                            Ok(thermo) => thermo.pretty_print(),
                            Err(e) => println!("\x1b[31m{}\x1b[0m", e),
                        }
                    }
                }
            }
            "5" => {
                if let Some(task) = pick_task(list) {
                    if let Some(t_c) = prompt_parse::<f64>("Temperature, °C: ") {
                        match task.set_temperature(Temperature::Celsius(t_c)) {
                            Ok(()) => task.pretty_print(),
                            Err(e) => println!("\x1b[31m{}\x1b[0m", e),
                        }
                    }
                }
            }
            "6" => {
                let points = with_settings(|manager| manager.config().line_points);
                if let Some(task) = pick_task(list) {
                    match task.nernst_line() {
                        Ok(line) => {
                            println!("{}: E = {:.4} - {:.5}*pH V", line.label, line.e0, line.slope());
                            for (ph, e) in line.sample(0.0, 14.0, points.min(15)) {
                                println!("pH = {:5.2}  E = {:.4} V", ph, e);
                            }
                        }
                        Err(e) => println!("\x1b[31m{}\x1b[0m", e),
                    }
                }
            }
            "7" => {
                if let Some(task) = pick_task(list) {
                    match task.dg_sweep(-100.0, 500.0, 13) {
                        Some(sweep) => {
                            for (t_c, dg) in sweep {
                                println!("T = {:6.1} °C  dG = {:.2} kJ/mol", t_c, dg);
                            }
                        }
                        None => println!("Reaction has no thermodynamic data yet"),
                    }
                }
            }
            "8" => {
                if let Some(index) = prompt_parse::<usize>("Reaction number: ") {
                    match index.checked_sub(1).and_then(|i| list.remove(i)) {
                        Some(task) => println!("Removed {}", task.equation),
                        None => println!("There is no reaction {}", index),
                    }
                }
            }
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn show_diagram(catalog: &PhaseCatalog) {
    let (temperature, grid, points) = with_settings(|manager| {
        let config = manager.config();
        (config.temperature(), config.grid, config.line_points)
    });
    catalog.pretty_print();
    let mut diagram = match compute_diagram(&catalog.phases, temperature, &grid) {
        Ok(diagram) => diagram,
        Err(e) => {
            println!("\x1b[31m{}\x1b[0m", e);
            return;
        }
    };
    if let Err(e) = diagram.add_water_lines(points) {
        error!("{}", e);
    }
    diagram.pretty_print();
    let file = prompt("Save diagram as JSON (file name, empty to skip): ");
    if file.is_empty() {
        return;
    }
    match diagram.to_json() {
        Ok(json) => match fs::write(&file, json) {
            Ok(()) => println!("Saved to {}", file),
            Err(e) => println!("\x1b[31mcannot write '{}': {}\x1b[0m", file, e),
        },
        Err(e) => println!("\x1b[31m{}\x1b[0m", e),
    }
}

pub fn pourbaix_menu() {
    loop {
        show_menu(
            "Pourbaix diagrams",
            &["Fe-H2O (built-in catalog)", "Phase catalog from task file"],
        );
        match get_user_input().trim() {
            "1" => show_diagram(&PhaseCatalog::iron()),
            "2" => {
                let file = prompt("Task file: ");
                match load_phases_from_file(&file) {
                    Ok(catalog) => show_diagram(&catalog),
                    Err(e) => println!("\x1b[31m{}\x1b[0m", e),
                }
            }
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

pub fn settings_menu() {
    loop {
        let config = with_settings(|manager| manager.config().clone());
        println!(
            "\ntemperature {} °C, tolerance {} kJ/mol, policy {:?}, thermo library {}, grid {}x{}, log level {}",
            config.default_temperature_c,
            config.spontaneity_tolerance_kj,
            config.thermo_policy,
            config.thermo_library.as_deref().unwrap_or("built-in"),
            config.grid.n_ph,
            config.grid.n_e,
            config.log_level
        );
        show_menu(
            "Settings",
            &[
                "Default temperature",
                "Spontaneity tolerance",
                "Toggle strict thermo policy",
                "Thermo library file",
                "Diagram resolution",
                "Log level (takes effect on restart)",
                "Reset to defaults",
            ],
        );
        let result = match get_user_input().trim() {
            "1" => prompt_parse::<f64>("Temperature, °C: ")
                .map(|t| with_settings_mut(|m| m.set_default_temperature(t))),
            "2" => prompt_parse::<f64>("Tolerance, kJ/mol: ")
                .map(|tol| with_settings_mut(|m| m.set_tolerance(tol))),
            "3" => {
                let policy = match config.thermo_policy {
                    ThermoPolicy::Lenient => ThermoPolicy::Strict,
                    ThermoPolicy::Strict => ThermoPolicy::Lenient,
                };
                Some(with_settings_mut(|m| m.set_thermo_policy(policy)))
            }
            "4" => {
                let file = prompt("File with a THERMO section (empty for built-in only): ");
                let path = (!file.is_empty()).then_some(file.as_str());
                Some(with_settings_mut(|m| m.set_thermo_library(path)))
            }
            "5" => {
                let n_ph: Option<usize> = prompt_parse("Points along pH: ");
                let n_e: Option<usize> = prompt_parse("Points along E: ");
                match (n_ph, n_e) {
                    (Some(n_ph), Some(n_e)) => {
                        let mut grid = config.grid;
                        grid.n_ph = n_ph;
                        grid.n_e = n_e;
                        Some(with_settings_mut(|m| m.set_grid(grid)))
                    }
                    _ => None,
                }
            }
            "6" => {
                let level = prompt("Level (error, warn, info, debug, trace): ");
                Some(with_settings_mut(|m| m.set_log_level(&level)))
            }
            "7" => Some(with_settings_mut(|m| m.reset_to_defaults())),
            "0" => break,
            _ => {
                println!("Invalid choice. Please try again.");
                None
            }
        };
        if let Some(Err(e)) = result {
            println!("\x1b[31m{}\x1b[0m", e);
        }
    }
}
