//! Sex-conditioned name and title tables.
//!
//! The fake-data library draws last names and most other vocabulary, but it
//! cannot condition a first name or a courtesy title on the requested sex,
//! so those come from fixed tables drawn through the caller's RNG.

use rand::rngs::StdRng;
use rand::Rng;

use crate::models::Sex;

/// Common male first names.
const MALE_FIRST_NAMES: &[&str] = &[
    "James", "Michael", "Robert", "John", "David", "William", "Richard", "Joseph", "Thomas",
    "Christopher", "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Andrew", "Paul",
    "Joshua", "Kenneth", "Kevin", "Brian", "Timothy", "Ronald", "Jason", "George", "Edward",
    "Jeffrey", "Ryan", "Jacob", "Nicholas", "Gary", "Eric", "Jonathan", "Stephen", "Larry",
    "Justin", "Scott", "Brandon", "Benjamin", "Samuel", "Gregory", "Alexander", "Patrick",
    "Frank", "Raymond", "Jack", "Dennis", "Jerry", "Tyler", "Aaron", "Nathan", "Henry", "Adam",
    "Douglas", "Peter", "Zachary", "Kyle", "Noah", "Ethan",
];

/// Common female first names.
const FEMALE_FIRST_NAMES: &[&str] = &[
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica", "Sarah",
    "Karen", "Lisa", "Nancy", "Betty", "Sandra", "Margaret", "Ashley", "Kimberly", "Emily",
    "Donna", "Michelle", "Carol", "Amanda", "Melissa", "Deborah", "Stephanie", "Rebecca",
    "Sharon", "Laura", "Cynthia", "Dorothy", "Amy", "Kathleen", "Angela", "Shirley", "Brenda",
    "Emma", "Anna", "Pamela", "Nicole", "Samantha", "Katherine", "Christine", "Helen", "Debra",
    "Rachel", "Carolyn", "Janet", "Maria", "Catherine", "Heather", "Diane", "Olivia", "Julie",
    "Victoria", "Joyce", "Lauren", "Kelly", "Christina", "Ruth", "Joan",
];

/// Courtesy titles by sex.
const MALE_TITLES: &[&str] = &["Mr."];
const FEMALE_TITLES: &[&str] = &["Mrs.", "Ms.", "Miss"];

/// Draws a first name conditioned on sex from the explicit stream.
pub fn first_name(rng: &mut StdRng, sex: Sex) -> &'static str {
    match sex {
        Sex::Male => pick(rng, MALE_FIRST_NAMES),
        Sex::Female => pick(rng, FEMALE_FIRST_NAMES),
    }
}

/// Draws a courtesy title conditioned on sex from the explicit stream.
pub fn title(rng: &mut StdRng, sex: Sex) -> &'static str {
    match sex {
        Sex::Male => pick(rng, MALE_TITLES),
        Sex::Female => pick(rng, FEMALE_TITLES),
    }
}

/// Uniform draw from a static table.
pub fn pick(rng: &mut StdRng, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn first_names_respect_sex() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let male = first_name(&mut rng, Sex::Male);
            assert!(MALE_FIRST_NAMES.contains(&male));
            let female = first_name(&mut rng, Sex::Female);
            assert!(FEMALE_FIRST_NAMES.contains(&female));
        }
    }

    #[test]
    fn titles_respect_sex() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(title(&mut rng, Sex::Male), "Mr.");
        assert!(FEMALE_TITLES.contains(&title(&mut rng, Sex::Female)));
    }

    #[test]
    fn tables_are_nonempty_and_unique() {
        for table in [MALE_FIRST_NAMES, FEMALE_FIRST_NAMES] {
            let unique: std::collections::HashSet<_> = table.iter().collect();
            assert_eq!(unique.len(), table.len());
        }
    }
}
