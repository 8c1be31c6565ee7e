//! # View
//!
//! HTML markup for the cart page. Header and footer belong to the host site
//! and are supplied through [`PageChrome`].

use crate::cart::{Cart, CartItem};
use crate::totals::Totals;

/// Shown when an item has no image
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/80?text=No+Image";

/// Site header and footer surrounding the cart
pub trait PageChrome {
    /// Header with the cart badge (sum of quantities) and the signed-in user
    fn header(&self, cart_count: u64, username: &str) -> String;

    fn footer(&self) -> String;
}

/// Minimal header/footer
pub struct PlainChrome;

impl PageChrome for PlainChrome {
    fn header(&self, cart_count: u64, username: &str) -> String {
        format!(
            r#"<header class="site-header"><span class="user">{}</span><span class="cart-count">{}</span></header>"#,
            escape(username),
            cart_count
        )
    }

    fn footer(&self) -> String {
        r#"<footer class="site-footer"></footer>"#.to_string()
    }
}

/// Escape text for HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the whole page
pub fn render(cart: &Cart, totals: &Totals, chrome: &dyn PageChrome) -> String {
    if cart.is_empty() {
        return render_empty();
    }

    let mut html = String::new();
    html.push_str(r#"<div class="cart-root">"#);
    html.push_str(&chrome.header(totals.unit_count, &cart.username));
    html.push_str(r#"<div class="cart-container"><div class="cart-page">"#);
    html.push_str(r##"<a href="#" class="back-button">← Shopping Continue</a>"##);
    html.push_str(&format!(
        r#"<div class="cart-header"><h2>Shopping Cart</h2><p>You have {} items in your cart</p></div>"#,
        totals.item_count
    ));

    html.push_str(r#"<div class="cart-items">"#);
    for item in &cart.items {
        html.push_str(&render_item(item));
    }
    html.push_str("</div></div>");

    html.push_str(&render_summary(totals));
    html.push_str("</div>");
    html.push_str(&chrome.footer());
    html.push_str("</div>");
    html
}

fn render_empty() -> String {
    r#"<div class="cart-page empty"><h2>Your Cart is Empty</h2><p>Add some items to get started!</p></div>"#
        .to_string()
}

fn render_item(item: &CartItem) -> String {
    let id = escape(&item.product_id.to_string());
    let image = item
        .image_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(PLACEHOLDER_IMAGE);

    format!(
        concat!(
            r#"<div class="cart-item" data-product-id="{id}">"#,
            r#"<img src="{image}" alt="{name}"/>"#,
            r#"<div class="item-details"><h3>{name}</h3><p>{description}</p>"#,
            r#"<div class="quantity-controls">"#,
            r#"<button data-action="decrement" data-product-id="{id}">-</button>"#,
            r#"<span>{quantity}</span>"#,
            r#"<button data-action="increment" data-product-id="{id}">+</button>"#,
            r#"</div>"#,
            r#"<span class="price">{total}</span>"#,
            r#"<button data-action="remove" data-product-id="{id}">🗑️</button>"#,
            r#"</div></div>"#,
        ),
        id = id,
        image = escape(image),
        name = escape(&item.name),
        description = escape(&item.description),
        quantity = item.quantity,
        total = item.line_total.display(),
    )
}

fn render_summary(totals: &Totals) -> String {
    format!(
        r#"<div class="checkout-section"><h2>Order Summary</h2><p>Total: {}</p><button data-action="checkout">Proceed to Checkout</button></div>"#,
        totals.grand_total.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartItem, ProductId};
    use crate::money::{Currency, Price};

    fn cart() -> Cart {
        Cart::new("asha <admin>")
            .with_item(
                CartItem::new(ProductId::Numeric(1), "Mug", Price::new(150.0, Currency::INR), 2)
                    .with_description("Stoneware")
                    .with_image("https://img.example/mug.png"),
            )
            .with_item(CartItem::new(ProductId::Numeric(2), "Tea & Co", Price::new(99.5, Currency::INR), 1))
    }

    #[test]
    fn test_empty_state() {
        let cart = Cart::new("asha");
        let html = render(&cart, &Totals::of(&cart.items), &PlainChrome);

        assert!(html.contains("Your Cart is Empty"));
        assert!(html.contains("Add some items to get started!"));
        assert!(!html.contains("site-header"));
        assert!(!html.contains("Proceed to Checkout"));
    }

    #[test]
    fn test_item_list_and_summary() {
        let cart = cart();
        let html = render(&cart, &Totals::of(&cart.items), &PlainChrome);

        assert!(html.contains("You have 2 items in your cart"));
        assert!(html.contains(r#"<span class="cart-count">3</span>"#));
        assert!(html.contains("₹300.00"));
        assert!(html.contains("https://img.example/mug.png"));
        assert!(html.contains(PLACEHOLDER_IMAGE));
        // 399.50 + 370.00 shipping
        assert!(html.contains("Total: ₹769.50"));
        assert!(html.contains("Proceed to Checkout"));
    }

    #[test]
    fn test_badge_counts_past_u32() {
        let cart = Cart::new("asha")
            .with_item(CartItem::new(ProductId::Numeric(1), "Mug", Price::new(150.0, Currency::INR), 3_000_000_000))
            .with_item(CartItem::new(ProductId::Numeric(2), "Tea", Price::new(99.5, Currency::INR), 3_000_000_000));
        let html = render(&cart, &Totals::of(&cart.items), &PlainChrome);

        assert!(html.contains(r#"<span class="cart-count">6000000000</span>"#));
        assert!(html.contains("You have 2 items in your cart"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let cart = cart();
        let html = render(&cart, &Totals::of(&cart.items), &PlainChrome);

        assert!(html.contains("Tea &amp; Co"));
        assert!(html.contains("asha &lt;admin&gt;"));
        assert!(!html.contains("<admin>"));
    }

    #[test]
    fn test_custom_chrome() {
        struct Branded;

        impl PageChrome for Branded {
            fn header(&self, cart_count: u64, _username: &str) -> String {
                format!("<nav>SalesSavvy ({})</nav>", cart_count)
            }

            fn footer(&self) -> String {
                "<footer>© SalesSavvy</footer>".to_string()
            }
        }

        let cart = cart();
        let html = render(&cart, &Totals::of(&cart.items), &Branded);
        assert!(html.contains("<nav>SalesSavvy (3)</nav>"));
        assert!(html.ends_with("<footer>© SalesSavvy</footer></div>"));
    }
}
