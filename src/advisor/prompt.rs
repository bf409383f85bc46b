use crate::analyze::dto::DogProfile;
use crate::nutrition::NutritionRecord;

/// Fixed instruction the model receives ahead of the dog and food facts.
const PREAMBLE: &str = "You are a veterinarian specialising in dogs. You will be given a dog's \
breed, age and weight, together with a dog food product and its nutrition facts. Reply with a \
short, precise recommendation: how much of this food the dog should eat per day, and whether \
the food is generally a good fit for this dog.";

/// One flat prompt string: preamble, then the dog's attributes, then
/// whatever nutrition facts the lookup actually returned.
pub fn build_prompt(nutrition: &NutritionRecord, dog: &DogProfile) -> String {
    let mut prompt = String::from(PREAMBLE);

    prompt.push_str("\n\nThe dog has the following properties:\n");
    prompt.push_str(&format!("- breed: {}\n", dog.breed));
    prompt.push_str(&format!("- age: {} years\n", dog.age_years));
    prompt.push_str(&format!("- weight: {} kg\n", dog.weight_kg));
    prompt.push_str(&format!("- activity level: {}\n", dog.activity.describe()));
    if dog.allergies.is_empty() {
        prompt.push_str("- known allergies: none\n");
    } else {
        prompt.push_str(&format!("- known allergies: {}\n", dog.allergies.join(", ")));
    }
    if let Some(notes) = dog.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        prompt.push_str(&format!("- additional notes: {notes}\n"));
    }

    prompt.push_str("\nThe food has the following properties:\n");
    push_text(&mut prompt, "product name", nutrition.product_name.as_deref());
    push_text(&mut prompt, "brands", nutrition.brands.as_deref());
    push_text(&mut prompt, "ingredients", nutrition.ingredients_text.as_deref());
    push_text(&mut prompt, "serving size", nutrition.serving_size.as_deref());
    push_number(&mut prompt, "energy per 100g (kcal)", nutrition.energy_kcal_100g);
    push_number(&mut prompt, "fat per 100g (g)", nutrition.fat_100g);
    push_number(&mut prompt, "carbohydrates per 100g (g)", nutrition.carbohydrates_100g);
    push_number(&mut prompt, "protein per 100g (g)", nutrition.proteins_100g);

    prompt
}

fn push_text(prompt: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        prompt.push_str(&format!("- {label}: {value}\n"));
    }
}

fn push_number(prompt: &mut String, label: &str, value: Option<f64>) {
    if let Some(value) = value {
        prompt.push_str(&format!("- {label}: {value}\n"));
    }
}
