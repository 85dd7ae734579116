pub const REDOX_HELPER: &str = "
                                Reactions
Type a reaction with any of the arrows ->, =, =>, <=>, →, ⇌. Species are separated by ' + '.
Charges may be written as Fe+3, Fe3+, Fe^{3+}, Fe^3+, Fe³⁺ or Cl-; electrons as e, e-, e⁻ or
electron. Phase marks (s), (l), (g), (aq) are ignored. Coefficients typed by the user are
dropped: the balancer assigns them.
If a reaction is a combination of several independent reactions, every free coefficient is
set to 1 when that gives a valid balance; otherwise the smallest positive balance found is
used. A warning is printed in both cases.

                                Thermodynamics
dH (kJ/mol) and dS (J/mol/K) are summed from the built-in table, or from a THERMO section
of a task file configured in the settings. Species without data count as zero (lenient
policy) or stop the calculation (strict policy). dH and dS may also be entered directly.
dG = dH - T*dS, K = exp(-dG/RT), E0 = -dG/(nF).

                                Task files
A task file holds sections under one-word headers:
REACTIONS  one equation per line
THERMO     {\"Fe+2\": {\"dh\": -89.1, \"s\": -137.7}, ...}
PHASES     [{\"name\": \"Fe2+\", \"gf\": -78900.0, \"charge\": 2, \"protons\": 0,
             \"log_activity\": -6.0, \"kind\": \"Aqueous\"}, ...]

                                Pourbaix diagrams
Gf of a phase is the Gibbs energy (J/mol) of its formation from the metal and water,
charge is the number of electrons and protons the number of H+ released by that
half-reaction, multiplicity the number of metal atoms per formula unit.
";
