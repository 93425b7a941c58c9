//! The fixed editing instruction sent with every image.

/// E-commerce cleanup instruction: white background, glare and dust
/// removal, soft shadow, centered framing.
pub const ECOMMERCE_PROMPT: &str = "Remove the current background completely and replace it with a clean pure white (#FFFFFF) ecommerce background. \
Remove harsh shining, reflections, and glare from the product surface. \
Enhance lighting while keeping the product\u{2019}s true colors accurate. \
Increase sharpness, clarity, and contrast so the surface details and textures are clearly visible. \
Clean up dust, scratches, and imperfections. \
Remove any hands or boxes from the image, but do not remove any cables that are part of the product. \
Maintain the exact product shape and decals without distortion. \
Do not add any parts to it. \
Add a soft, natural product shadow below the item for a premium studio feel. \
Center the motorcycle body part in the frame with balanced spacing around it. \
Final result should be high-resolution and suitable for Amazon or Shopify product listing.";
