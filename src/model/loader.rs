//! Load rent rolls from the property-management CSV export

use super::UnderwritingModel;
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row matching the rent roll export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Unit")]
    unit: String,
    #[serde(rename = "MonthlyRent")]
    monthly_rent: f64,
}

/// One unit from the rent roll
#[derive(Debug, Clone)]
pub struct RentRollUnit {
    pub unit: String,
    pub monthly_rent: f64,
}

/// A parsed rent roll
#[derive(Debug, Clone, Default)]
pub struct RentRoll {
    pub units: Vec<RentRollUnit>,
}

impl RentRoll {
    /// Annualized gross potential rent across all units
    pub fn annual_gross_rent(&self) -> f64 {
        self.units.iter().map(|u| u.monthly_rent * 12.0).sum()
    }

    pub fn unit_count(&self) -> u32 {
        self.units.len() as u32
    }

    /// Overlay the roll's totals onto a model's income assumptions
    pub fn apply_to(&self, model: &mut UnderwritingModel) {
        model.gross_potential_rent = self.annual_gross_rent();
        model.unit_count = self.unit_count();
    }
}

/// Load a rent roll from a CSV file
pub fn load_rent_roll<P: AsRef<Path>>(path: P) -> Result<RentRoll, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    collect_units(reader)
}

/// Load a rent roll from any reader (e.g., string buffer, network stream)
pub fn load_rent_roll_from_reader<R: std::io::Read>(reader: R) -> Result<RentRoll, Box<dyn Error>> {
    collect_units(Reader::from_reader(reader))
}

fn collect_units<R: std::io::Read>(mut reader: Reader<R>) -> Result<RentRoll, Box<dyn Error>> {
    let mut units = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        if row.monthly_rent < 0.0 {
            return Err(format!("Negative rent for unit {}", row.unit).into());
        }
        units.push(RentRollUnit {
            unit: row.unit,
            monthly_rent: row.monthly_rent,
        });
    }

    Ok(RentRoll { units })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Unit,MonthlyRent
101,1850.00
102,1850.00
201,2100.00
202,2150.00
";

    #[test]
    fn test_load_rent_roll_from_reader() {
        let roll = load_rent_roll_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(roll.unit_count(), 4);
        assert!((roll.annual_gross_rent() - 95_400.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_to_model() {
        let roll = load_rent_roll_from_reader(SAMPLE.as_bytes()).unwrap();
        let mut model = UnderwritingModel::default();
        roll.apply_to(&mut model);
        assert_eq!(model.unit_count, 4);
        assert!((model.gross_potential_rent - 95_400.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_rent_rejected() {
        let bad = "Unit,MonthlyRent\n101,-5.0\n";
        assert!(load_rent_roll_from_reader(bad.as_bytes()).is_err());
    }
}
