//! Recipe suggestions for soon-to-expire food.
//!
//! Suggestions are canned templates with the item's name substituted in. The
//! template set is picked by category; unknown categories get the default set.
//! Nothing here touches the network.

use crate::core::category::Category;
use std::time::Duration;

/// Default artificial wait before [`generate_recipes`] answers, in milliseconds.
pub const RECIPE_DELAY_MS: u64 = 1000;

/// How demanding a recipe is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    /// Minimal prep
    Easy,
    /// Some technique involved
    Medium,
}

impl Difficulty {
    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
        }
    }
}

/// One suggested recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Position in the suggestion list, starting at 1
    pub id: u32,
    /// Recipe title
    pub title: String,
    /// One-paragraph pitch
    pub summary: String,
    /// Total time estimate
    pub ready_in_minutes: u32,
    /// Number of servings
    pub servings: u32,
    /// Difficulty estimate
    pub difficulty: Difficulty,
    /// Ingredient lines
    pub ingredients: Vec<String>,
    /// Ordered steps
    pub instructions: Vec<String>,
}

// `{Name}` is replaced verbatim, `{name}` with the lowercased name.
struct Template {
    title: &'static str,
    summary: &'static str,
    minutes: u32,
    servings: u32,
    difficulty: Difficulty,
    ingredients: &'static [&'static str],
    instructions: &'static [&'static str],
}

static DEFAULT_TEMPLATES: [Template; 3] = [
    Template {
        title: "Fresh {Name} Stir Fry",
        summary: "A quick and delicious stir fry featuring fresh {name}. Perfect for using up ingredients before they expire!",
        minutes: 20,
        servings: 4,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "2 cups fresh {name}",
            "2 tbsp vegetable oil",
            "2 cloves garlic, minced",
            "1 tbsp fresh ginger",
            "2 tbsp soy sauce",
            "1 tsp sesame oil",
        ],
        instructions: &[
            "Heat oil in a large pan or wok over medium-high heat.",
            "Add {name} and cook for 3-4 minutes.",
            "Add your choice of protein and vegetables.",
            "Season with soy sauce, garlic, and ginger.",
            "Serve hot over rice or noodles.",
        ],
    },
    Template {
        title: "{Name} Soup",
        summary: "A hearty and nutritious soup that's perfect for using up {name} before it goes bad.",
        minutes: 35,
        servings: 6,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "3 cups {name}",
            "1 onion, diced",
            "3 cloves garlic",
            "6 cups broth",
            "Salt and pepper to taste",
            "Fresh herbs",
        ],
        instructions: &[
            "Sauté onions and garlic in a large pot.",
            "Add {name} and cook for 5 minutes.",
            "Pour in vegetable or chicken broth.",
            "Simmer for 20-25 minutes until tender.",
            "Season with herbs and spices to taste.",
        ],
    },
    Template {
        title: "Roasted {Name}",
        summary: "Simple roasted {name} that brings out natural flavors and makes a great side dish.",
        minutes: 45,
        servings: 4,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "2 lbs {name}",
            "3 tbsp olive oil",
            "Salt and pepper",
            "Fresh rosemary or thyme",
            "Optional: garlic powder",
        ],
        instructions: &[
            "Preheat oven to 400°F (200°C).",
            "Cut {name} into even pieces.",
            "Toss with olive oil, salt, and pepper.",
            "Roast for 25-35 minutes until tender.",
            "Garnish with fresh herbs before serving.",
        ],
    },
];

static FRUIT_TEMPLATES: [Template; 3] = [
    Template {
        title: "{Name} Smoothie",
        summary: "Blend ripe {name} into a cold, creamy smoothie before it turns.",
        minutes: 5,
        servings: 2,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "2 cups {name}, chopped",
            "1 banana",
            "1 cup yogurt",
            "1/2 cup milk",
            "1 tbsp honey",
        ],
        instructions: &[
            "Add {name}, banana, yogurt and milk to a blender.",
            "Blend until smooth.",
            "Sweeten with honey to taste and serve cold.",
        ],
    },
    Template {
        title: "Baked {Name} Crumble",
        summary: "Soft, overripe {name} is exactly what a warm crumble wants.",
        minutes: 50,
        servings: 6,
        difficulty: Difficulty::Medium,
        ingredients: &[
            "4 cups {name}, sliced",
            "1 cup rolled oats",
            "1/2 cup flour",
            "1/2 cup brown sugar",
            "1/2 cup cold butter, cubed",
            "1 tsp cinnamon",
        ],
        instructions: &[
            "Preheat oven to 350°F (175°C).",
            "Spread {name} in a baking dish.",
            "Rub oats, flour, sugar, butter and cinnamon into a coarse crumb.",
            "Scatter the crumb over the fruit.",
            "Bake for 35-40 minutes until golden and bubbling.",
        ],
    },
    Template {
        title: "{Name} Fruit Salad",
        summary: "A bright salad built around {name} with a honey-lime dressing.",
        minutes: 15,
        servings: 4,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "2 cups {name}",
            "1 cup mixed berries",
            "1 lime, juiced",
            "1 tbsp honey",
            "Fresh mint",
        ],
        instructions: &[
            "Cut {name} into bite-sized pieces.",
            "Toss with berries.",
            "Whisk lime juice and honey and pour over the fruit.",
            "Garnish with mint and chill before serving.",
        ],
    },
];

static DAIRY_TEMPLATES: [Template; 3] = [
    Template {
        title: "{Name} Frittata",
        summary: "An oven frittata that turns leftover {name} into a filling breakfast.",
        minutes: 30,
        servings: 4,
        difficulty: Difficulty::Medium,
        ingredients: &[
            "1 cup {name}",
            "8 eggs",
            "1 cup spinach",
            "1/2 onion, diced",
            "Salt and pepper",
        ],
        instructions: &[
            "Preheat oven to 375°F (190°C).",
            "Whisk eggs with {name}, salt and pepper.",
            "Soften onion and spinach in an oven-safe skillet.",
            "Pour in the egg mixture and cook for 3 minutes.",
            "Finish in the oven for 15 minutes until set.",
        ],
    },
    Template {
        title: "Creamy {Name} Pasta Sauce",
        summary: "Fold {name} into a quick pan sauce for weeknight pasta.",
        minutes: 20,
        servings: 4,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "1 cup {name}",
            "400 g pasta",
            "2 tbsp butter",
            "2 cloves garlic, minced",
            "1/2 cup grated parmesan",
        ],
        instructions: &[
            "Cook pasta until al dente, reserving a cup of water.",
            "Melt butter and soften the garlic.",
            "Stir in {name} and parmesan until smooth.",
            "Toss with pasta, loosening with pasta water as needed.",
        ],
    },
    Template {
        title: "{Name} Pancakes",
        summary: "Fluffy pancakes that use up {name} in the batter.",
        minutes: 25,
        servings: 4,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "1 cup {name}",
            "1 1/2 cups flour",
            "2 tsp baking powder",
            "1 egg",
            "2 tbsp melted butter",
        ],
        instructions: &[
            "Whisk flour and baking powder together.",
            "Beat in {name}, egg and melted butter.",
            "Ladle onto a hot griddle and cook until bubbles form.",
            "Flip and cook until golden.",
        ],
    },
];

static PROTEIN_TEMPLATES: [Template; 3] = [
    Template {
        title: "Garlic Butter {Name} Skillet",
        summary: "Sear {name} in garlic butter for a fast, high-heat dinner.",
        minutes: 25,
        servings: 4,
        difficulty: Difficulty::Medium,
        ingredients: &[
            "1 1/2 lbs {name}",
            "3 tbsp butter",
            "4 cloves garlic, minced",
            "1 lemon",
            "Fresh parsley",
        ],
        instructions: &[
            "Pat {name} dry and season with salt and pepper.",
            "Sear in a hot skillet until browned and cooked through.",
            "Lower the heat, add butter and garlic and baste.",
            "Finish with lemon juice and parsley.",
        ],
    },
    Template {
        title: "{Name} Tacos",
        summary: "Spiced {name} tucked into warm tortillas with a quick slaw.",
        minutes: 30,
        servings: 4,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "1 lb {name}",
            "8 small tortillas",
            "1 tbsp taco seasoning",
            "2 cups shredded cabbage",
            "1 lime",
        ],
        instructions: &[
            "Toss {name} with taco seasoning.",
            "Cook in a hot pan until done.",
            "Dress the cabbage with lime juice.",
            "Fill warm tortillas with {name} and slaw.",
        ],
    },
    Template {
        title: "Sheet Pan {Name} and Vegetables",
        summary: "Roast {name} alongside whatever vegetables need using up.",
        minutes: 40,
        servings: 4,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "1 1/2 lbs {name}",
            "4 cups mixed vegetables",
            "3 tbsp olive oil",
            "1 tsp smoked paprika",
            "Salt and pepper",
        ],
        instructions: &[
            "Preheat oven to 425°F (220°C).",
            "Toss {name} and vegetables with oil and spices.",
            "Spread on a sheet pan in a single layer.",
            "Roast for 20-25 minutes until cooked through.",
        ],
    },
];

static GRAIN_TEMPLATES: [Template; 3] = [
    Template {
        title: "{Name} Fried Rice",
        summary: "Day-old {name} fries up crisp with eggs and vegetables.",
        minutes: 20,
        servings: 4,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "3 cups {name}",
            "2 eggs",
            "1 cup frozen peas and carrots",
            "3 tbsp soy sauce",
            "2 green onions",
        ],
        instructions: &[
            "Scramble the eggs in a hot wok and set aside.",
            "Stir-fry vegetables for 2 minutes.",
            "Add {name} and press flat to crisp.",
            "Return the eggs, add soy sauce and green onions.",
        ],
    },
    Template {
        title: "{Name} Bake",
        summary: "A cheesy oven bake that gives {name} a second life.",
        minutes: 40,
        servings: 6,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "4 cups {name}",
            "2 cups tomato sauce",
            "1 1/2 cups shredded cheese",
            "1 tsp dried oregano",
        ],
        instructions: &[
            "Preheat oven to 375°F (190°C).",
            "Mix {name} with tomato sauce and oregano.",
            "Top with cheese.",
            "Bake for 25 minutes until bubbling.",
        ],
    },
    Template {
        title: "{Name} Salad Bowl",
        summary: "A hearty grain bowl built on {name} with a lemon dressing.",
        minutes: 15,
        servings: 2,
        difficulty: Difficulty::Easy,
        ingredients: &[
            "2 cups {name}",
            "1 cucumber, diced",
            "1 cup cherry tomatoes",
            "1/4 cup feta",
            "2 tbsp lemon vinaigrette",
        ],
        instructions: &[
            "Fluff {name} into a large bowl.",
            "Add cucumber, tomatoes and feta.",
            "Dress with vinaigrette and toss.",
        ],
    },
];

fn templates_for(category: &str) -> &'static [Template] {
    match category.parse::<Category>() {
        Ok(Category::Fruits) => &FRUIT_TEMPLATES,
        Ok(Category::Dairy) => &DAIRY_TEMPLATES,
        Ok(Category::Meat | Category::Seafood) => &PROTEIN_TEMPLATES,
        Ok(Category::Grains) => &GRAIN_TEMPLATES,
        _ => &DEFAULT_TEMPLATES,
    }
}

fn fill(text: &str, name: &str, lower: &str) -> String {
    text.replace("{Name}", name).replace("{name}", lower)
}

/// Recipe suggestions for `name` in `category`.
#[must_use]
pub fn suggest_recipes(name: &str, category: &str) -> Vec<Recipe> {
    let name = name.trim();
    let lower = name.to_lowercase();

    (1..)
        .zip(templates_for(category))
        .map(|(id, template)| Recipe {
            id,
            title: fill(template.title, name, &lower),
            summary: fill(template.summary, name, &lower),
            ready_in_minutes: template.minutes,
            servings: template.servings,
            difficulty: template.difficulty,
            ingredients: template
                .ingredients
                .iter()
                .map(|line| fill(line, name, &lower))
                .collect(),
            instructions: template
                .instructions
                .iter()
                .map(|line| fill(line, name, &lower))
                .collect(),
        })
        .collect()
}

/// [`suggest_recipes`] behind a fixed delay, for surfaces that show a loading
/// state while recipes are "fetched".
pub async fn generate_recipes(name: &str, category: &str, delay: Duration) -> Vec<Recipe> {
    tokio::time::sleep(delay).await;
    suggest_recipes(name, category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_for_vegetables() {
        let recipes = suggest_recipes("Broccoli", "Vegetables");
        assert_eq!(recipes.len(), 3);
        assert_eq!(recipes[0].title, "Fresh Broccoli Stir Fry");
        assert_eq!(recipes[1].title, "Broccoli Soup");
        assert_eq!(recipes[2].title, "Roasted Broccoli");
        assert_eq!(recipes[0].ingredients[0], "2 cups fresh broccoli");
        assert_eq!(recipes.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_category_selects_template_set() {
        assert_eq!(suggest_recipes("Mango", "Fruits")[0].title, "Mango Smoothie");
        assert_eq!(suggest_recipes("Ricotta", "dairy")[0].title, "Ricotta Frittata");
        assert_eq!(suggest_recipes("Shrimp", "Seafood")[1].title, "Shrimp Tacos");
        assert_eq!(suggest_recipes("Rice", "Grains")[0].title, "Rice Fried Rice");
    }

    #[test]
    fn test_unknown_category_falls_back_to_default() {
        let recipes = suggest_recipes("Mystery", "Snacks");
        assert_eq!(recipes[0].title, "Fresh Mystery Stir Fry");
    }

    #[test]
    fn test_name_substituted_everywhere() {
        for recipe in suggest_recipes("Zucchini", "Other") {
            assert!(!recipe.title.contains('{'));
            assert!(recipe.summary.contains("zucchini"));
            assert!(recipe.ingredients.iter().all(|line| !line.contains("{name}")));
            assert!(recipe.instructions.iter().any(|line| line.contains("zucchini")));
        }
    }

    #[tokio::test]
    async fn test_generate_recipes_matches_sync_version() {
        let delayed = generate_recipes("Kale", "Vegetables", Duration::from_millis(1)).await;
        assert_eq!(delayed, suggest_recipes("Kale", "Vegetables"));
    }
}
