//! Interactive sidebar.
//!
//! Loads the table once, then loops over the three sidebar controls and
//! prints a fresh render after every change.

use cenipa_map_cli_utils::MultiProgress;
use cenipa_map_dashboard::SidebarState;
use cenipa_map_dashboard::sidebar::{MAX_YEAR, MIN_YEAR};
use cenipa_map_occurrence_models::Classification;
use dialoguer::{Confirm, Input, MultiSelect};

use crate::report;

/// Runs the interactive sidebar until the user stops changing filters.
///
/// # Errors
///
/// Returns an error if the occurrence table cannot be loaded or a prompt
/// fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let cache = crate::loading_cache(multi)?;
    let table = cache.load().await?;
    let attribution = cache.definition().attribution.clone();

    println!("{} occurrences loaded.", table.len());

    let mut state = SidebarState::default();

    loop {
        let year: String = Input::new()
            .with_prompt(format!("Year ({MIN_YEAR}-{MAX_YEAR})"))
            .default(state.year().to_string())
            .validate_with(|input: &String| {
                SidebarState::default()
                    .with_year_str(input)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;

        let options = Classification::all();
        let labels: Vec<&str> = options.iter().map(Classification::as_ref).collect();
        let defaults: Vec<bool> = options
            .iter()
            .map(|c| state.classifications().contains(c))
            .collect();

        let picked = MultiSelect::new()
            .with_prompt("Classifications (space to toggle)")
            .items(&labels)
            .defaults(&defaults)
            .interact()?;

        let show_table = Confirm::new()
            .with_prompt("Show table?")
            .default(state.show_table())
            .interact()?;

        state = state
            .with_year_str(&year)?
            .with_classifications(picked.into_iter().map(|i| options[i]))
            .with_show_table(show_table);

        println!();
        print!("{}", report::format_report(&table, &state, &attribution));
        println!();

        if !Confirm::new()
            .with_prompt("Change filters?")
            .default(true)
            .interact()?
        {
            return Ok(());
        }
    }
}
