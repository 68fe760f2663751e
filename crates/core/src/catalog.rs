//! Compiled-in product and category tables plus the storefront filter.
//!
//! The tables are the single source of truth for what the backfill walks
//! and what the API serves. Order is significant: the backfill visits
//! entries in table order.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Entry types
// ---------------------------------------------------------------------------

/// A product line in the storefront.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    /// Short marketing line shown under the name.
    pub tagline: &'static str,
    pub category: &'static str,
    pub benefit: &'static str,
    pub ingredients: &'static [&'static str],
    /// Prompt for the packshot ("main") image.
    #[serde(skip)]
    pub image_prompt: &'static str,
    /// Prompt for the macro texture image.
    #[serde(skip)]
    pub texture_prompt: &'static str,
    /// Static image shown until a generated one is cached.
    pub fallback_image: &'static str,
}

/// A browsable collection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(skip)]
    pub prompt: &'static str,
    pub fallback_image: &'static str,
}

/// Filter value that selects the whole catalog.
pub const ALL_CATEGORIES: &str = "all";

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

pub const PRODUCTS: &[Product] = &[
    Product {
        id: "vit-c",
        name: "Vitamin C Serum",
        tagline: "C-Glow Vitality",
        category: "Serums",
        benefit: "A potent 15% Vitamin C serum that brightens dark spots and defends against environmental stressors for a radiant complexion.",
        ingredients: &["L-Ascorbic Acid", "Ferulic Acid", "Vitamin E"],
        image_prompt: "High-end Vitamin C serum bottle, amber glass, on white stone, sunny morning lighting, minimalist, 8k.",
        texture_prompt: "Macro of a lightweight orange-tinted liquid serum droplet.",
        fallback_image: "https://i5.walmartimages.com/seo/Vitamin-C-Face-20-Aging-Facial-Super-Vit-C-with-Vitamin-E-Radiance-Enhancing-Firming-Revitalizing-Serum-for-Dark-Skin-Gifts-1-Fl-Oz-30ml_3d87b24d-7795-4cb9-857f-daeca71ecd3d.e09c78a8202e219bc6f19dd114436d74.jpeg",
    },
    Product {
        id: "hyaluronic",
        name: "Hyaluronic Acid",
        tagline: "Deep Hydration Boost",
        category: "Hydration",
        benefit: "A multi-molecular weight hyaluronic complex that penetrates deep into the dermis to plump and hydrate.",
        ingredients: &["Niacidamide", "Zinc PCA", "Hyaluronic Acid"],
        image_prompt: "Minimalist glass dropper bottle on a light sage background, professional studio lighting, 8k.",
        texture_prompt: "Macro of a crystal clear water-like serum droplet.",
        fallback_image: "https://beautykitchen.net/wp-content/uploads/2021/01/Web-Hyaluronic-Acid-serum-1.jpg",
    },
    Product {
        id: "retinol",
        name: "Retinol Night Cream",
        tagline: "Overnight Repair",
        category: "Treatment",
        benefit: "A clinical-strength retinol treatment that resurfaces skin and reduces the appearance of fine lines while you sleep.",
        ingredients: &["Retinol", "Ceramides", "Bakuchiol"],
        image_prompt: "A luxury white cosmetic jar on a light beige textured background, minimalist aesthetic, 8k.",
        texture_prompt: "Macro close-up of a smooth, rich white cream swatch.",
        fallback_image: "https://www.baar.com/Merchant2/graphics/00000001/retinol-night-cream-96303-Label_Revision.jpg",
    },
    Product {
        id: "lactic-acid",
        name: "Lactic Acid 5%",
        tagline: "Resurface Polish",
        category: "Serums",
        benefit: "Gentle exfoliation for smoother, more even skin texture and tone. Perfect for sensitive skin.",
        ingredients: &["Lactic Acid", "Tasmanian Pepperberry"],
        image_prompt: "Premium frosted glass skincare bottle labeled \"Lactic Acid\", elegant minimalist design, white marble background, 8k.",
        texture_prompt: "Macro of a milky white semi-translucent serum texture.",
        fallback_image: "https://cdn.mos.cms.futurecdn.net/whowhatwear/posts/307554/best-lactic-acid-serums-307554-1685479783211-main.jpg?interlace=true&quality=70",
    },
    Product {
        id: "under-eye",
        name: "Under Eye Cream",
        tagline: "Revitalizing Wake-up",
        category: "Treatment",
        benefit: "Reduces puffiness and dark circles with a caffeine-infused botanical blend.",
        ingredients: &["Caffeine", "Peptides", "Green Tea"],
        image_prompt: "Luxury eye cream jar on a soft linen surface, morning light, high-end skincare photography.",
        texture_prompt: "Macro of a light, cooling peach-tinted eye cream texture.",
        fallback_image: "https://heavenlyhome.in/wp-content/uploads/2023/09/Under-eye-cream-1-PhotoRoom-1-PhotoRoom-1-1-1.webp",
    },
    Product {
        id: "gel-cleanser",
        name: "Pimple Eraser Gel Cleanser",
        tagline: "Clear Skin Purifier",
        category: "Cleansers",
        benefit: "A deep-cleansing gel that targets blemishes and excess oil without stripping moisture.",
        ingredients: &["Salicylic Acid", "Zinc", "Witch Hazel"],
        image_prompt: "Sleek gel cleanser bottle in a splash of water, clean white background, clinical aesthetic.",
        texture_prompt: "Macro of a clear bubbling gel texture with small oxygen beads.",
        fallback_image: "https://myquickfx.com/wp-content/uploads/2024/06/PE-Gel-Cleanser-Upsize-Front-768x768.jpg",
    },
    Product {
        id: "facial-rub",
        name: "Smoothing Facial Rub",
        tagline: "Gentle Polish",
        category: "Exfoliants",
        benefit: "A fine-grain facial rub that manually exfoliates for instant smoothness and refined pores.",
        ingredients: &["Bamboo Micro-particles", "Aloe Vera", "Vitamin B5"],
        image_prompt: "Skincare scrub tube on a wet stone surface, organic minimalist feel.",
        texture_prompt: "Macro of a creamy white scrub with tiny smoothing granules.",
        fallback_image: "https://www.pharmhealth.com/wp-content/uploads/simple_skin_smoothing_facial_scrub_75ml.jpg",
    },
    Product {
        id: "toner",
        name: "Facial Toner",
        tagline: "pH Balancing Mist",
        category: "Toners",
        benefit: "Restores natural pH and prepares the surface for optimal serum absorption.",
        ingredients: &["Rose Water", "Glycerin", "Probiotics"],
        image_prompt: "Frosted glass toner bottle with mist spray, ethereal lighting, minimalist.",
        texture_prompt: "Macro of fine water mist droplets on a cool glass surface.",
        fallback_image: "https://hyalogic.com/wp-content/uploads/2019/12/Facial-Toner-Front.png",
    },
    Product {
        id: "moisturiser",
        name: "Daily Facial Moisturiser",
        tagline: "Barrier Protection",
        category: "Hydration",
        benefit: "A lightweight cream that locks in moisture and strengthens the skin barrier.",
        ingredients: &["Ceramides", "Squalane", "Oat Extract"],
        image_prompt: "Modern pump bottle for face cream, clean professional studio setting, soft shadows.",
        texture_prompt: "Macro of a thick, silky white moisturizing cream swirl.",
        fallback_image: "https://www.byrdie.com/thmb/XTyMB49qBb656NtcNFRK9xKw4wU=/fit-in/1500x640/filters:no_upscale():max_bytes(150000):strip_icc()/11289613-1864444636907175-a79f70a13b104d2a84bc8e24f84b7a1e.jpg",
    },
    Product {
        id: "dark-spot-corrector",
        name: "Dark Spot Corrector",
        tagline: "Luminous Tone Repair",
        category: "Treatment",
        benefit: "Targets persistent dark spots and post-acne marks for a more uniform complexion.",
        ingredients: &["Niacinamide", "Tranexamic Acid", "Licorice Root"],
        image_prompt: "Elegant bottle for dark spot treatment, clinical yet luxury aesthetic, minimalist background.",
        texture_prompt: "Macro of a dense white creamy serum with a pearlescent sheen.",
        fallback_image: "https://m.media-amazon.com/images/I/71c-VWQPprL._AC_.jpg",
    },
    Product {
        id: "sun-protection",
        name: "Sun Protection Facial Cream SPF 50+",
        tagline: "Broad Spectrum Shield",
        category: "Treatment",
        benefit: "Ultra-high protection against UVA/UVB rays with a water-resistant, non-greasy finish.",
        ingredients: &["Zinc Oxide", "Vitamin E", "Thermal Water"],
        image_prompt: "Sleek sunscreen tube, professional suncare photography, bright outdoor lighting, minimalist.",
        texture_prompt: "Macro of a thick white sunscreen cream, smooth and non-oily.",
        fallback_image: "https://www.biobalance.com.tr/Uploads/Icerik_Kapak/24-spf-50plus-very-high-protection-water-resistant-sun-protection-cream09738052-c9c5-424f-9212-ae14e26c5da3.png",
    },
    Product {
        id: "face-mask",
        name: "Hyaluronic Acid Hydrating Face Mask",
        tagline: "Instant Plump Ritual",
        category: "Hydration",
        benefit: "A concentrated sheet mask that delivers intense hydration and an immediate plumping effect.",
        ingredients: &["Hyaluronic Acid", "Aloe Vera", "Cucumber Extract"],
        image_prompt: "High-end sheet mask packaging, minimalist design, refreshing watery aesthetic.",
        texture_prompt: "Macro of a serum-drenched sheet mask fabric texture.",
        fallback_image: "https://facefacts.me/cdn/shop/products/HyaluronicSheetMaskproductshot.jpg?v=1635163706",
    },
];

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "Serums",
        name: "Serums",
        prompt: "Elegant glass serum bottles, minimalist aesthetic, 8k.",
        fallback_image: "https://images.unsplash.com/photo-1620916566398-39f1143af7be?auto=format&fit=crop&q=80&w=400",
    },
    Category {
        id: "Hydration",
        name: "Hydration",
        prompt: "Pure water droplets and glass jars, minimalist, 8k.",
        fallback_image: "https://images.unsplash.com/photo-1570194065650-d99fb4b8ccb0?auto=format&fit=crop&q=80&w=400",
    },
    Category {
        id: "Treatment",
        name: "Treatment",
        prompt: "Luxury cosmetic jars on a textured surface, 8k.",
        fallback_image: "https://images.unsplash.com/photo-1598440448730-bd3413998822?auto=format&fit=crop&q=80&w=400",
    },
];

/// Products merchandised into a collection besides their own category.
const CROSS_LISTED: &[(&str, &[&str])] = &[
    ("Hydration", &["face-mask", "hyaluronic", "moisturiser"]),
    (
        "Treatment",
        &["dark-spot-corrector", "sun-protection", "under-eye", "retinol"],
    ),
    ("Serums", &["vit-c", "lactic-acid", "dark-spot-corrector"]),
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn find_product(id: &str) -> Result<&'static Product, CoreError> {
    PRODUCTS
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "product",
            id: id.to_string(),
        })
}

pub fn find_category(id: &str) -> Result<&'static Category, CoreError> {
    CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "category",
            id: id.to_string(),
        })
}

/// Products shown under a category filter, in table order.
///
/// `"all"` selects everything. The three collections also pull in their
/// cross-listed products; any other value matches the product's own
/// category (and may select nothing).
pub fn products_in_category(category: &str) -> Vec<&'static Product> {
    if category == ALL_CATEGORIES {
        return PRODUCTS.iter().collect();
    }

    let extras = CROSS_LISTED
        .iter()
        .find(|(cat, _)| *cat == category)
        .map(|(_, ids)| *ids)
        .unwrap_or(&[]);

    PRODUCTS
        .iter()
        .filter(|p| p.category == category || extras.contains(&p.id))
        .collect()
}
