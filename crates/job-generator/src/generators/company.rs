//! Company names and locations.

use super::choose;
use rand::Rng;

const SURNAMES: [&str; 40] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores",
];

const SUFFIXES: [&str; 6] = ["Inc", "LLC", "Group", "PLC", "Ltd", "and Sons"];

/// The 50 US states.
pub const US_STATES: [&str; 50] = [
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa", "Kansas",
    "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota",
    "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire", "New Jersey",
    "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio", "Oklahoma", "Oregon",
    "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota", "Tennessee", "Texas",
    "Utah", "Vermont", "Virginia", "Washington", "West Virginia", "Wisconsin", "Wyoming",
];

/// Generate a company name from one of the common naming patterns.
pub fn generate_company<R: Rng>(rng: &mut R) -> String {
    match rng.gen_range(0..3) {
        0 => format!("{} {}", choose(rng, &SURNAMES), choose(rng, &SUFFIXES)),
        1 => format!("{}-{}", choose(rng, &SURNAMES), choose(rng, &SURNAMES)),
        _ => format!(
            "{}, {} and {}",
            choose(rng, &SURNAMES),
            choose(rng, &SURNAMES),
            choose(rng, &SURNAMES)
        ),
    }
}

/// Generate a state-level location.
pub fn generate_location<R: Rng>(rng: &mut R) -> String {
    choose(rng, &US_STATES).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_company_uses_surnames() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let company = generate_company(&mut rng);
            assert!(!company.is_empty());
            assert!(
                SURNAMES.iter().any(|s| company.starts_with(s)),
                "unexpected company name {company}"
            );
        }
    }

    #[test]
    fn test_generate_location_is_state() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let location = generate_location(&mut rng);
            assert!(US_STATES.contains(&location.as_str()));
        }
    }
}
