use super::cli_main::get_user_input;
use crate::Examples::redox_examples::redox_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Balancing in different notations");
        println!("2. Permanganate half-reaction: thermodynamics and Nernst line");
        println!("3. dG of water formation over temperature");
        println!("4. Nernst lines and water stability limits");
        println!("5. Iron Pourbaix diagram");
        println!("6. Lenient and strict thermo policies");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let choice = get_user_input();
        match choice.trim().parse::<usize>() {
            Ok(0) => break,
            Ok(n) if n <= 6 => redox_examples(n - 1),
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
