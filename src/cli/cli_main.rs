use super::cli_examples::examples_menu;
use super::cli_redox::{pourbaix_menu, reaction_menu, settings_menu};
use super::redox_help::REDOX_HELPER;
use crate::Reactions::User_reactions::ReactionList;
use std::io::{self, Write};

pub fn run_interactive_menu() {
    // reactions registered during this session
    let mut session = ReactionList::new();
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => reaction_menu(&mut session),
            "2" => pourbaix_menu(),
            "3" => settings_menu(),
            "4" => examples_menu(),
            "5" => println!("{}", REDOX_HELPER),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to RedoxThe: balancing, thermodynamics and potential-pH diagrams\n
    of redox reactions in water \n \x1b[0m"
    );
    println!("\x1b[33m1. Reactions: balance, thermodynamics, Nernst lines\x1b[0m");
    println!("\x1b[33m2. Pourbaix diagrams\x1b[0m");
    println!("\x1b[33m3. Settings\x1b[0m");
    println!("\x1b[33m4. Examples\x1b[0m");
    println!("\x1b[33m5. Help\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

/// one line from stdin; a closed stdin reads as "0" so every menu can exit
pub fn get_user_input() -> String {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => "0".to_string(),
        Ok(_) => input,
    }
}

pub fn prompt(text: &str) -> String {
    print!("\x1b[36m{}\x1b[0m", text);
    let _ = io::stdout().flush();
    get_user_input().trim().to_string()
}

pub fn prompt_parse<T: std::str::FromStr>(text: &str) -> Option<T> {
    let answer = prompt(text);
    match answer.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            println!("'{}' is not a valid value", answer);
            None
        }
    }
}
