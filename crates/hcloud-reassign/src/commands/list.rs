use colored::Colorize;
use hcloud_reassign_core::{
    ReassignConfig, ReassignError, ResourceSection, ResourceType, ValidationError,
    validate_section,
};

/// Print the configured sections, or only `resources` when given
pub fn handle(config: &ReassignConfig, resources: &[String]) -> anyhow::Result<i32> {
    if config.sections.is_empty() {
        println!("{}", "No resource sections configured".yellow());
        return Ok(0);
    }

    let mut code = 0;
    let selected: Vec<(&str, &ResourceSection)> = if resources.is_empty() {
        config
            .sections
            .iter()
            .map(|(name, section)| (name.as_str(), section))
            .collect()
    } else {
        let mut selected = Vec::new();
        for name in resources {
            match config.sections.get(name) {
                Some(section) => selected.push((name.as_str(), section)),
                None => {
                    eprintln!("{}: {}", name.red(), ReassignError::UnknownResource(name.clone()));
                    code = 2;
                }
            }
        }
        selected
    };

    println!("Resource sections: {}", selected.len());
    for (name, section) in selected {
        println!(
            "  - {} ({})",
            name.cyan(),
            section.section_type().unwrap_or("no type")
        );
        println!("      source:      {}", section.text("source").unwrap_or("-"));
        println!(
            "      destination: {}",
            section.text("destination").unwrap_or("-")
        );

        match check(section) {
            Ok(()) => println!("      {}", "✓ valid".green()),
            Err(e) => println!("      {} {}", "✗".red(), e),
        }
    }

    Ok(code)
}

fn check(section: &ResourceSection) -> Result<(), ReassignError> {
    let raw = section.section_type().ok_or(ValidationError::MissingType)?;
    let ty = ResourceType::from_type(raw)
        .ok_or_else(|| ReassignError::UnknownType(raw.to_string()))?;
    validate_section(section, ty.as_str(), ty.schema())?;
    Ok(())
}
