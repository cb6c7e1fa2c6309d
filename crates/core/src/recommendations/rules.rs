//! Rule tables for base candidates and the informational clothing catalog

use super::types::{Candidate, ClothingCategory, FeatureVector};
use super::{RAIN_RISK_THRESHOLD, WIND_FEATURE_THRESHOLD};

use ClothingCategory::{Accessories, Bottom, Feet, Hands, Head, Outerwear, Top};

#[derive(Debug, Clone, Copy)]
struct CandidateSeed {
    category: ClothingCategory,
    item: &'static str,
    priority: f64,
    layer_index: u8,
}

const fn seed(
    category: ClothingCategory,
    item: &'static str,
    priority: f64,
    layer_index: u8,
) -> CandidateSeed {
    CandidateSeed { category, item, priority, layer_index }
}

const FREEZING_BAND: &[CandidateSeed] = &[
    seed(Outerwear, "Heavy winter coat", 1.0, 3),
    seed(Head, "Winter hat", 1.0, 3),
    seed(Hands, "Insulated gloves", 1.0, 3),
    seed(Bottom, "Thermal underwear", 1.0, 1),
    seed(Bottom, "Warm pants", 1.0, 2),
    seed(Feet, "Winter boots", 1.0, 3),
];

const VERY_COLD_BAND: &[CandidateSeed] = &[
    seed(Outerwear, "Heavy coat", 1.0, 3),
    seed(Top, "Warm sweater", 1.0, 2),
    seed(Bottom, "Long pants", 1.0, 2),
    seed(Head, "Beanie", 0.8, 3),
    seed(Accessories, "Scarf", 0.8, 3),
];

const COLD_BAND: &[CandidateSeed] = &[
    seed(Outerwear, "Warm jacket", 1.0, 3),
    seed(Top, "Long sleeve shirt", 1.0, 1),
    seed(Top, "Sweater or cardigan", 0.8, 2),
    seed(Bottom, "Jeans or pants", 1.0, 2),
];

const COOL_BAND: &[CandidateSeed] = &[
    seed(Outerwear, "Light jacket", 0.9, 2),
    seed(Top, "Long sleeve shirt", 1.0, 1),
    seed(Bottom, "Jeans", 1.0, 2),
];

const MILD_BAND: &[CandidateSeed] = &[
    seed(Top, "Light sweater or cardigan", 0.7, 2),
    seed(Top, "T-shirt or blouse", 1.0, 1),
    seed(Bottom, "Comfortable pants", 1.0, 2),
];

const WARM_BAND: &[CandidateSeed] = &[
    seed(Top, "T-shirt", 1.0, 1),
    seed(Bottom, "Light pants or jeans", 1.0, 2),
];

const HOT_BAND: &[CandidateSeed] = &[
    seed(Top, "Light breathable shirt", 1.0, 1),
    seed(Bottom, "Shorts or light pants", 1.0, 1),
    seed(Accessories, "Sunglasses", 0.8, 1),
];

const VERY_HOT_BAND: &[CandidateSeed] = &[
    seed(Top, "Tank top or light shirt", 1.0, 1),
    seed(Bottom, "Shorts", 1.0, 1),
    seed(Accessories, "Sunglasses", 1.0, 1),
    seed(Head, "Sun hat", 0.9, 1),
];

const RAIN_GEAR: &[CandidateSeed] = &[
    seed(Outerwear, "Waterproof jacket", 1.0, 3),
    seed(Accessories, "Umbrella", 1.0, 0),
    seed(Feet, "Waterproof shoes", 0.9, 2),
];

const SUN_GEAR: &[CandidateSeed] = &[seed(Accessories, "Sunscreen", 0.7, 0)];

const WIND_GEAR: &[CandidateSeed] = &[seed(Outerwear, "Windbreaker", 0.8, 2)];

/// Exactly one band applies for any temperature.
fn temperature_band(celsius: f64, snowy: bool) -> &'static [CandidateSeed] {
    if celsius < 0.0 || snowy {
        FREEZING_BAND
    } else if celsius < 5.0 {
        VERY_COLD_BAND
    } else if celsius < 10.0 {
        COLD_BAND
    } else if celsius < 15.0 {
        COOL_BAND
    } else if celsius < 20.0 {
        MILD_BAND
    } else if celsius < 25.0 {
        WARM_BAND
    } else if celsius < 30.0 {
        HOT_BAND
    } else {
        VERY_HOT_BAND
    }
}

/// Temperature band first, then each weather-flag addition that applies.
pub fn base_candidates(features: &FeatureVector) -> Vec<Candidate> {
    let celsius = features.celsius();
    let mut seeds: Vec<CandidateSeed> = temperature_band(celsius, features.snowy()).to_vec();

    if features.rainy() || features.precip_risk > RAIN_RISK_THRESHOLD {
        seeds.extend_from_slice(RAIN_GEAR);
    }
    if features.sunny() && celsius > 20.0 {
        seeds.extend_from_slice(SUN_GEAR);
    }
    if features.wind_speed > WIND_FEATURE_THRESHOLD {
        seeds.extend_from_slice(WIND_GEAR);
    }

    seeds
        .into_iter()
        .map(|seed| Candidate {
            category: seed.category,
            item: seed.item.to_string(),
            priority: seed.priority,
            layer_index: seed.layer_index,
        })
        .collect()
}

/// Informational taxonomy of known garments per category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClothingCatalog {
    entries: &'static [(ClothingCategory, &'static [&'static str])],
}

const CATALOG: &[(ClothingCategory, &[&str])] = &[
    (
        Outerwear,
        &["Heavy winter coat", "Heavy coat", "Warm jacket", "Light jacket", "Windbreaker", "Waterproof jacket"],
    ),
    (Top, &["Tank top", "T-shirt", "Long sleeve shirt", "Sweater", "Cardigan", "Thermal underwear"]),
    (Bottom, &["Shorts", "Light pants", "Jeans", "Warm pants", "Thermal underwear"]),
    (Feet, &["Sandals", "Sneakers", "Waterproof shoes", "Boots", "Winter boots"]),
    (Head, &["Sun hat", "Cap", "Beanie", "Winter hat"]),
    (Hands, &["Light gloves", "Insulated gloves"]),
    (Accessories, &["Sunglasses", "Umbrella", "Scarf", "Sunscreen"]),
];

impl Default for ClothingCatalog {
    fn default() -> Self {
        Self { entries: CATALOG }
    }
}

impl ClothingCatalog {
    pub fn items(&self, category: ClothingCategory) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(entry_category, _)| *entry_category == category)
            .map(|(_, items)| *items)
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = ClothingCategory> + '_ {
        self.entries.iter().map(|(category, _)| *category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendations::features::normalize_temperature;

    fn features(celsius: f64) -> FeatureVector {
        FeatureVector {
            temperature: normalize_temperature(celsius),
            feels_like: normalize_temperature(celsius),
            temp_category: 0.0,
            temp_trend: 0.0,
            temp_volatility: 0.0,
            is_rainy: 0.0,
            is_snowy: 0.0,
            is_sunny: 0.0,
            is_cloudy: 0.0,
            precip_risk: 0.0,
            precip_level: 0.0,
            comfort_score: 0.5,
            humidity: 0.5,
            wind_speed: 0.0,
            time_of_day: 0.33,
            is_work_hours: 0.0,
            needs_all_day_gear: 1.0,
            activity_level: 0.5,
            style_preference: 0.5,
        }
    }

    fn items(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|candidate| candidate.item.as_str()).collect()
    }

    #[test]
    fn each_temperature_lands_in_exactly_one_band() {
        assert_eq!(items(&base_candidates(&features(4.9)))[0], "Heavy coat");
        assert_eq!(items(&base_candidates(&features(5.0)))[0], "Warm jacket");
        assert_eq!(items(&base_candidates(&features(14.0)))[0], "Light jacket");
        assert_eq!(items(&base_candidates(&features(19.5)))[0], "Light sweater or cardigan");
        assert_eq!(items(&base_candidates(&features(22.0))), vec!["T-shirt", "Light pants or jeans"]);
        assert_eq!(items(&base_candidates(&features(29.0)))[0], "Light breathable shirt");
    }

    #[test]
    fn snow_selects_the_freezing_band_above_zero() {
        let mut snowy = features(2.0);
        snowy.is_snowy = 1.0;

        let candidates = base_candidates(&snowy);
        let names = items(&candidates);
        for expected in ["Heavy winter coat", "Winter hat", "Insulated gloves", "Winter boots"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn flag_additions_are_appended_after_the_band() {
        let mut stormy = features(32.0);
        stormy.precip_risk = 0.5;
        stormy.is_sunny = 1.0;
        stormy.wind_speed = 0.6;

        let candidates = base_candidates(&stormy);
        let names = items(&candidates);
        assert_eq!(
            names,
            vec![
                "Tank top or light shirt",
                "Shorts",
                "Sunglasses",
                "Sun hat",
                "Waterproof jacket",
                "Umbrella",
                "Waterproof shoes",
                "Sunscreen",
                "Windbreaker",
            ]
        );
    }

    #[test]
    fn catalog_lists_every_category() {
        let catalog = ClothingCatalog::default();
        assert_eq!(catalog.categories().count(), 7);
        assert!(catalog.items(Hands).contains(&"Insulated gloves"));
    }
}
