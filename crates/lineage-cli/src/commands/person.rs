//! Person commands

use clap::{Args, Subcommand};

use super::{load_tree, save_tree, GenderArg};
use crate::output::{format_table, or_dash, print_json, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::limits::validate_free_text;
use lineage_core::person::normalize_reference;
use lineage_core::{PersonRecord, Year};

#[derive(Args)]
pub struct PersonArgs {
    #[command(subcommand)]
    pub command: PersonCommands,
}

/// Field values shared by `add` and `update`
#[derive(Args, Default)]
pub struct PersonFields {
    /// Parent name ("none" clears it)
    #[arg(long)]
    pub parent: Option<String>,
    /// Birth year
    #[arg(long, allow_negative_numbers = true)]
    pub birth: Option<i32>,
    /// Death year
    #[arg(long, allow_negative_numbers = true)]
    pub death: Option<i32>,
    #[arg(long, value_enum)]
    pub gender: Option<GenderArg>,
    #[arg(long)]
    pub location: Option<String>,
    /// Spouse name ("none" clears it)
    #[arg(long)]
    pub spouse: Option<String>,
    #[arg(long)]
    pub occupation: Option<String>,
    /// Photo URL
    #[arg(long)]
    pub photo: Option<String>,
    /// Generation number
    #[arg(long, allow_negative_numbers = true)]
    pub generation: Option<i32>,
    /// Highlight in rendered views
    #[arg(long)]
    pub highlight: Option<bool>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl PersonFields {
    /// Apply every given field to the record
    fn apply(&self, record: &mut PersonRecord) -> anyhow::Result<()> {
        if let Some(parent) = &self.parent {
            record.parent = normalize_reference(parent);
        }
        if let Some(birth) = self.birth {
            record.birth = Year::Known(birth);
        }
        if let Some(death) = self.death {
            record.death = Year::Known(death);
        }
        if let Some(gender) = self.gender {
            record.gender = gender.into();
        }
        if let Some(location) = &self.location {
            validate_free_text("location", location)?;
            record.location = location.clone();
        }
        if let Some(spouse) = &self.spouse {
            record.spouse = normalize_reference(spouse);
        }
        if let Some(occupation) = &self.occupation {
            validate_free_text("occupation", occupation)?;
            record.occupation = occupation.clone();
        }
        if let Some(photo) = &self.photo {
            let photo = photo.trim();
            record.photo = (!photo.is_empty()).then(|| photo.to_string());
        }
        if let Some(generation) = self.generation {
            record.generation = Some(generation);
        }
        if let Some(highlight) = self.highlight {
            record.highlight = highlight;
        }
        if let Some(notes) = &self.notes {
            validate_free_text("notes", notes)?;
            record.notes = notes.clone();
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add a new person
    Add {
        /// Person name
        name: String,
        #[command(flatten)]
        fields: PersonFields,
    },
    /// List persons
    List {
        /// Limit results
        #[arg(short, long, default_value = "1000")]
        limit: usize,
    },
    /// Get person details
    Get {
        /// Person name
        name: String,
    },
    /// Update an existing person
    Update {
        /// Person name
        name: String,
        /// Clear the birth year
        #[arg(long, conflicts_with = "birth")]
        clear_birth: bool,
        /// Clear the death year
        #[arg(long, conflicts_with = "death")]
        clear_death: bool,
        /// Clear the generation
        #[arg(long, conflicts_with = "generation")]
        clear_generation: bool,
        #[command(flatten)]
        fields: PersonFields,
    },
    /// Remove a person
    Remove {
        /// Person name
        name: String,
    },
    /// Rename a person, updating parent and spouse references
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
}

pub async fn run(args: &PersonArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::debug!("Running person command for tree: {}", ctx.tree);

    match &args.command {
        PersonCommands::Add { name, fields } => {
            let (mut tree, mut dataset) = load_tree(ctx, true).await?;

            let mut record = PersonRecord::new(name.trim());
            fields.apply(&mut record)?;
            dataset.add(record)?;

            save_tree(ctx, &mut tree, &dataset).await?;
            tracing::info!("Added person: {}", name.trim());
            println!("Added person: {} (tree '{}')", name.trim(), tree.name);
        }
        PersonCommands::List { limit } => {
            let (tree, dataset) = load_tree(ctx, false).await?;
            let records: Vec<&PersonRecord> = dataset.iter().take(*limit).collect();
            tracing::info!("Found {} persons", records.len());

            if cli.format == OutputFormat::Json {
                return print_json(&records);
            }

            if records.is_empty() {
                println!("No persons in tree '{}'", tree.name);
                return Ok(());
            }

            let rows: Vec<Vec<String>> = records
                .iter()
                .map(|r| {
                    vec![
                        r.name.clone(),
                        or_dash(r.parent.as_deref()),
                        r.birth.to_string(),
                        or_dash(r.death.known()),
                        r.gender.to_string(),
                        or_dash(r.generation),
                        r.location.clone(),
                    ]
                })
                .collect();
            println!(
                "{}",
                format_table(
                    &["Name", "Parent", "Birth", "Death", "Gender", "Gen", "Location"],
                    &rows
                )
            );
            println!("\n{} of {} persons", records.len(), dataset.len());
        }
        PersonCommands::Get { name } => {
            let (tree, dataset) = load_tree(ctx, false).await?;
            let Some(record) = dataset.get(name) else {
                anyhow::bail!("Person '{}' not found in tree '{}'", name, tree.name);
            };

            if cli.format == OutputFormat::Json {
                return print_json(record);
            }

            let relationships = dataset.relationships();
            let children = relationships.children_of(name);

            println!("Person: {}", record.name);
            println!("  Parent: {}", or_dash(record.parent.as_deref()));
            println!("  Born: {}", record.birth);
            println!(
                "  Died: {}",
                record
                    .death
                    .known()
                    .map_or_else(|| "Living".to_string(), |y| y.to_string())
            );
            if let Some(age) = record.lifespan() {
                println!("  Lifespan: {} years", age);
            }
            println!("  Gender: {}", record.gender);
            println!("  Generation: {}", or_dash(record.generation));
            for (label, value) in [
                ("Location", record.location.as_str()),
                ("Occupation", record.occupation.as_str()),
                ("Spouse", record.spouse.as_deref().unwrap_or("")),
                ("Photo", record.photo.as_deref().unwrap_or("")),
                ("Notes", record.notes.as_str()),
            ] {
                if !value.is_empty() {
                    println!("  {}: {}", label, value);
                }
            }
            if record.highlight {
                println!("  Highlighted");
            }
            if !children.is_empty() {
                println!("  Children: {}", children.join(", "));
            }
        }
        PersonCommands::Update {
            name,
            clear_birth,
            clear_death,
            clear_generation,
            fields,
        } => {
            let (mut tree, mut dataset) = load_tree(ctx, false).await?;
            let Some(record) = dataset.get_mut(name) else {
                anyhow::bail!("Person '{}' not found in tree '{}'", name, tree.name);
            };

            fields.apply(record)?;
            if *clear_birth {
                record.birth = Year::Unknown;
            }
            if *clear_death {
                record.death = Year::Unknown;
            }
            if *clear_generation {
                record.generation = None;
            }

            save_tree(ctx, &mut tree, &dataset).await?;
            tracing::info!("Updated person: {}", name);
            println!("Updated person: {}", name);
        }
        PersonCommands::Remove { name } => {
            let (mut tree, mut dataset) = load_tree(ctx, false).await?;
            let removed = dataset.remove(name);
            if removed == 0 {
                anyhow::bail!("Person '{}' not found in tree '{}'", name, tree.name);
            }

            let orphaned = dataset.relationships().dangling_parents().len();
            save_tree(ctx, &mut tree, &dataset).await?;
            tracing::info!("Removed person: {} ({} records)", name, removed);
            println!("Removed person: {}", name);
            if orphaned > 0 {
                println!(
                    "  {} persons now reference a missing parent; run 'lineage validate'",
                    orphaned
                );
            }
        }
        PersonCommands::Rename { old, new } => {
            let (mut tree, mut dataset) = load_tree(ctx, false).await?;
            dataset.rename(old, new.trim())?;
            save_tree(ctx, &mut tree, &dataset).await?;
            tracing::info!("Renamed person: {} -> {}", old, new.trim());
            println!("Renamed {} to {}", old, new.trim());
        }
    }

    Ok(())
}
