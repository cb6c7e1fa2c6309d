use super::{
    Accessory, ClothingColor, ClothingStyle, Garment, Headwear, OutfitDescriptor,
    HAT_PRIORITY_THRESHOLD, HAT_TEMPERATURE_CEILING,
};
use crate::recommendations::{ClothingCategory, Recommendation};
use crate::weather::ConditionFlags;

use ClothingColor::*;
use ClothingStyle::*;

/// Highest adjusted priority in `category`; the earliest wins a tie.
fn best_in(recommendations: &[Recommendation], category: ClothingCategory) -> Option<&Recommendation> {
    recommendations.iter().filter(|rec| rec.category == category).fold(None, |best, rec| match best {
        Some(current) if current.adjusted_priority >= rec.adjusted_priority => Some(current),
        _ => Some(rec),
    })
}

fn outerwear_garment(item: &str, temperature: f64) -> Option<Garment> {
    let item = item.to_lowercase();

    if item.contains("winter coat") || item.contains("heavy coat") {
        Some(Garment::new(Hoodie, Gray01))
    } else if item.contains("jacket") {
        if temperature < 10.0 {
            Some(Garment::new(Hoodie, Blue03))
        } else {
            Some(Garment::new(BlazerAndSweater, Blue01))
        }
    } else if item.contains("rain") {
        Some(Garment::new(Hoodie, Gray02))
    } else if item.contains("windbreaker") {
        Some(Garment::new(Hoodie, Blue02))
    } else {
        None
    }
}

fn top_garment(item: &str, temperature: f64) -> Option<Garment> {
    let item = item.to_lowercase();

    if item.contains("sweater") || item.contains("cardigan") {
        let color = if item.contains("warm") { Gray02 } else { PastelBlue };
        Some(Garment::new(BlazerAndSweater, color))
    } else if item.contains("long sleeve") {
        Some(Garment::new(ShirtCrewNeck, Blue02))
    } else if item.contains("shorts") {
        Some(Garment::new(Shorts, PastelBlue))
    } else if item.contains("t-shirt") || item.contains("tee") {
        if temperature > 25.0 {
            Some(Garment::new(ShirtVNeck, White))
        } else {
            Some(Garment::new(ShirtCrewNeck, PastelBlue))
        }
    } else if item.contains("tank top") {
        Some(Garment::new(ShirtVNeck, White))
    } else if item.contains("blouse") || item.contains("shirt") {
        Some(Garment::new(ShirtCrewNeck, PastelOrange))
    } else {
        None
    }
}

fn headwear(item: &str) -> Option<(Headwear, ClothingColor)> {
    let item = item.to_lowercase();

    if item.contains("winter hat") || item.contains("beanie") {
        Some((Headwear::WinterHat01, Blue02))
    } else if item.contains("sun hat") {
        Some((Headwear::Hat, PastelYellow))
    } else {
        None
    }
}

/// Temperature and condition defaults used when no recommendation maps to clothing.
pub fn fallback_outfit(temperature: f64, condition: &str) -> OutfitDescriptor {
    let flags = ConditionFlags::from_text(condition);
    let outfit = |garment: Garment| OutfitDescriptor {
        clothing: garment.style,
        clothing_color: garment.color,
        accessories: Accessory::None,
        top: None,
        hat_color: None,
    };

    if flags.rainy {
        outfit(Garment::new(Hoodie, Gray02))
    } else if flags.snowy || temperature < 0.0 {
        OutfitDescriptor {
            top: Some(Headwear::WinterHat01),
            hat_color: Some(Blue02),
            ..outfit(Garment::new(Hoodie, Gray01))
        }
    } else if temperature < 5.0 {
        outfit(Garment::new(Hoodie, Gray01))
    } else if temperature < 15.0 {
        outfit(Garment::new(BlazerAndSweater, Blue01))
    } else if temperature < 22.0 {
        outfit(Garment::new(ShirtCrewNeck, Blue02))
    } else if temperature < 28.0 {
        outfit(Garment::new(ShirtVNeck, PastelBlue))
    } else {
        OutfitDescriptor { accessories: Accessory::Sunglasses, ..outfit(Garment::new(ShirtVNeck, White)) }
    }
}

/// Maps the strongest recommendations onto an avatar outfit.
pub fn map_to_outfit(
    recommendations: &[Recommendation],
    temperature: f64,
    condition: &str,
) -> OutfitDescriptor {
    let garment = match best_in(recommendations, ClothingCategory::Outerwear) {
        Some(outerwear) => outerwear_garment(&outerwear.item, temperature),
        None => best_in(recommendations, ClothingCategory::Top)
            .and_then(|top| top_garment(&top.item, temperature)),
    };

    let accessories = match best_in(recommendations, ClothingCategory::Accessories) {
        Some(rec) if rec.item.to_lowercase().contains("sunglasses") => Accessory::Sunglasses,
        _ => Accessory::None,
    };

    let hat = best_in(recommendations, ClothingCategory::Head)
        .filter(|rec| {
            rec.adjusted_priority > HAT_PRIORITY_THRESHOLD && temperature < HAT_TEMPERATURE_CEILING
        })
        .and_then(|rec| headwear(&rec.item));

    let Some(garment) = garment else {
        let fallback = fallback_outfit(temperature, condition);
        tracing::debug!(
            event_name = "outfit.fallback.applied",
            temperature,
            condition,
            "no recommendation mapped to clothing"
        );
        let hat_from_fallback = fallback.top.is_some();
        return OutfitDescriptor {
            accessories: if fallback.accessories == Accessory::Sunglasses {
                Accessory::Sunglasses
            } else {
                accessories
            },
            top: if hat_from_fallback { fallback.top } else { hat.map(|(top, _)| top) },
            hat_color: if hat_from_fallback { fallback.hat_color } else { hat.map(|(_, color)| color) },
            ..fallback
        };
    };

    OutfitDescriptor {
        clothing: garment.style,
        clothing_color: garment.color,
        accessories,
        top: hat.map(|(top, _)| top),
        hat_color: hat.map(|(_, color)| color),
    }
}
