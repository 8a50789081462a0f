use serde::Deserialize;

use crate::carousel::CarouselError;

const TESTIMONIALS_JSON: &str = include_str!("../assets/testimonials.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub name: String,
    pub role: String,
}

impl Testimonial {
    /// Up to two initials for the avatar bubble.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect()
    }
}

pub fn load() -> Result<Vec<Testimonial>, CarouselError> {
    parse(TESTIMONIALS_JSON)
}

fn parse(raw: &str) -> Result<Vec<Testimonial>, CarouselError> {
    let testimonials: Vec<Testimonial> = serde_json::from_str(raw)?;
    if testimonials.is_empty() {
        return Err(CarouselError::NoItems);
    }
    Ok(testimonials)
}
