/// Two-letter vertical codes and their fixed path numbers.
///
/// Hand-assigned; the numbers are part of every encoded path and must
/// never be reordered.
pub const VERTICALS: [(&str, u64); 26] = [
    ("aa", 1),  // Apparel & Accessories
    ("ap", 2),  // Animals & Pet Supplies
    ("ae", 3),  // Arts & Entertainment
    ("bt", 4),  // Baby & Toddler
    ("bu", 5),  // Bundles
    ("bi", 6),  // Business & Industrial
    ("co", 7),  // Cameras & Optics
    ("el", 8),  // Electronics
    ("fb", 9),  // Food, Beverages & Tobacco
    ("fr", 10), // Furniture
    ("gc", 11), // Gift Cards
    ("ha", 12), // Hardware
    ("hb", 13), // Health & Beauty
    ("hg", 14), // Home & Garden
    ("lb", 15), // Luggage & Bags
    ("ma", 16), // Mature
    ("me", 17), // Media
    ("os", 18), // Office Supplies
    ("pa", 19), // Product Add-Ons
    ("rc", 20), // Religious & Ceremonial
    ("se", 21), // Services
    ("so", 22), // Software
    ("sg", 23), // Sporting Goods
    ("tg", 24), // Toys & Games
    ("na", 25), // Uncategorized
    ("vp", 26), // Vehicles & Parts
];

pub fn vertical_number(code: &str) -> Option<u64> {
    VERTICALS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, number)| *number)
}
