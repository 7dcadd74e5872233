//! `parcel inspect`: decode a compiled unit and print it.

use std::path::Path;

use parcel_build::CompiledUnit;

use crate::{GlobalArgs, InspectArgs, ReportFormat};

/// Runs the `parcel inspect` command.
pub fn run(args: &InspectArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let unit = read_unit(Path::new(&args.file))?;
    match args.format {
        ReportFormat::Text => print!("{}", render(&unit)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&unit)?),
    }
    Ok(0)
}

fn read_unit(path: &Path) -> Result<CompiledUnit, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    Ok(CompiledUnit::from_bytes(&bytes)?)
}

fn render(unit: &CompiledUnit) -> String {
    let mut out = format!("unit {} extends {}\n", unit.qualified_name(), unit.super_name);
    for field in &unit.fields {
        out.push_str(&format!("  {}: {}\n", field.name, field.type_name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_facade() {
        let unit = CompiledUnit::new("x/PackageFacade")
            .with_field("alpha", "x.Alpha")
            .with_field("beta", "x.Beta");
        assert_eq!(
            render(&unit),
            "unit x.PackageFacade extends parcel/Object\n  alpha: x.Alpha\n  beta: x.Beta\n"
        );
    }

    #[test]
    fn read_unit_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.unit");
        let unit = CompiledUnit::new("A");
        std::fs::write(&path, unit.to_bytes().unwrap()).unwrap();
        assert_eq!(read_unit(&path).unwrap(), unit);
    }

    #[test]
    fn read_unit_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.unit");
        std::fs::write(&path, b"not a unit").unwrap();
        assert!(read_unit(&path).is_err());
    }
}
