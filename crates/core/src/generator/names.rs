//! Word lists for names, companies, products and addresses.

use crate::generator::random::SeededRng;

pub const FIRST_NAMES: &[&str] = &[
    "Ava", "Liam", "Olivia", "Noah", "Emma", "Mason", "Sophia", "Lucas", "Isabella", "Ethan",
    "Mia", "Logan", "Amelia", "James", "Harper", "Elijah", "Evelyn", "Aiden", "Abigail", "Carter",
    "Grace", "Mateo", "Chloe", "Owen", "Priya", "Kenji", "Fatima", "Diego", "Hana", "Samir",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson",
    "Martin", "Lee", "Thompson", "White", "Harris", "Clark", "Lewis", "Walker", "Young", "Patel",
    "Nguyen", "Kim",
];

pub const COMPANY_WORDS: &[&str] = &[
    "Summit", "Harbor", "Pioneer", "Evergreen", "Keystone", "Northwind", "Bluebird", "Granite",
    "Meridian", "Crescent", "Redwood", "Silverline", "Horizon", "Oakridge", "Lakeside", "Cobalt",
];

pub const COMPANY_SUFFIXES: &[&str] =
    &["Inc", "LLC", "Group", "Holdings", "Partners", "Supply Co", "Trading", "Foods"];

pub const PRODUCT_ADJECTIVES: &[&str] = &[
    "Ergonomic", "Rustic", "Sleek", "Handcrafted", "Refined", "Gorgeous", "Practical", "Tasty",
    "Fantastic", "Licensed", "Recycled", "Modern", "Organic", "Luxurious", "Electronic", "Generic",
];

pub const PRODUCT_MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Concrete", "Plastic", "Cotton", "Granite", "Rubber", "Metal", "Soft",
    "Fresh", "Frozen", "Bronze",
];

pub const PRODUCT_NOUNS: &[&str] = &[
    "Chair", "Car", "Computer", "Keyboard", "Mouse", "Bike", "Ball", "Gloves", "Pants", "Shirt",
    "Table", "Shoes", "Hat", "Towels", "Soap", "Tuna", "Chicken", "Fish", "Cheese", "Bacon",
    "Pizza", "Salad", "Sausages", "Chips",
];

pub const STREET_NAMES: &[&str] = &[
    "Main", "Oak", "Maple", "Cedar", "Elm", "Washington", "Lake", "Hill", "Park", "Pine", "Sunset",
    "Ridge", "Church", "Mill", "River",
];

pub const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Blvd", "Rd", "Ln", "Way", "Dr", "Ct"];

pub const SUPPLIER_CITIES: &[&str] = &[
    "Portland", "Denver", "Atlanta", "Boston", "Seattle", "Austin", "Toronto", "Rotterdam",
    "Hamburg", "Lyon", "Osaka", "Monterrey", "Melbourne", "Shenzhen", "Mumbai",
];

pub const COUNTRIES: &[&str] = &[
    "United States", "Canada", "Mexico", "Germany", "France", "Netherlands", "Japan", "China",
    "India", "Australia", "Brazil", "Italy",
];

pub const STORE_FORMATS: &[&str] = &["Plaza", "Mall", "Center", "Market"];

pub const CAMPAIGN_KINDS: &[&str] = &["Sale", "Promo", "Launch", "Event"];

const EMAIL_DOMAINS: &[&str] = &["example.com", "mail.test", "inbox.test", "shopper.test"];

pub fn person_name(rng: &mut SeededRng) -> String {
    format!("{} {}", rng.word(FIRST_NAMES), rng.word(LAST_NAMES))
}

/// `first.last<nn>@domain`, lowercased.
pub fn email_for(rng: &mut SeededRng, name: &str) -> String {
    let local: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".")
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '.')
        .collect::<String>()
        .to_ascii_lowercase();
    format!("{local}{}@{}", rng.int(1, 99), rng.word(EMAIL_DOMAINS))
}

pub fn phone(rng: &mut SeededRng) -> String {
    format!("({}) {}-{}", rng.int(200, 989), rng.digits(3), rng.digits(4))
}

pub fn company(rng: &mut SeededRng) -> String {
    format!("{} {}", rng.word(COMPANY_WORDS), rng.word(COMPANY_SUFFIXES))
}

pub fn product_name(rng: &mut SeededRng) -> String {
    format!(
        "{} {} {}",
        rng.word(PRODUCT_ADJECTIVES),
        rng.word(PRODUCT_MATERIALS),
        rng.word(PRODUCT_NOUNS)
    )
}

pub fn street_address(rng: &mut SeededRng) -> String {
    format!("{} {} {}", rng.int(1, 9999), rng.word(STREET_NAMES), rng.word(STREET_SUFFIXES))
}
