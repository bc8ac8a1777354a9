//! Cart type conversion functions.
//!
//! Pure wire-to-domain mapping, no I/O. Money amount strings move through
//! untouched; nested merchandise/product/image structures are flattened into
//! the model the proxy and widgets consume.

use boboparty_core::{Cart, CartCost, CartLine, Money};

use super::wire;

pub fn convert_cart(cart: wire::Cart) -> Cart {
    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url,
        total_quantity: cart.total_quantity,
        cost: CartCost {
            subtotal: convert_money(cart.cost.subtotal_amount),
            total: convert_money(cart.cost.total_amount),
        },
        lines: cart
            .lines
            .edges
            .into_iter()
            .map(|edge| convert_line(edge.node))
            .collect(),
    }
}

fn convert_line(line: wire::CartLine) -> CartLine {
    let wire::Merchandise {
        id: merchandise_id,
        title,
        price,
        product,
    } = line.merchandise;

    // A product with no images is legal; the line just has no thumbnail
    let image_url = product
        .images
        .edges
        .into_iter()
        .next()
        .map(|edge| edge.node.url);

    CartLine {
        id: line.id,
        merchandise_id,
        quantity: line.quantity,
        title,
        product_title: product.title,
        product_handle: product.handle,
        image_url,
        price: convert_money(price),
    }
}

fn convert_money(money: wire::Money) -> Money {
    Money {
        amount: money.amount,
        currency_code: money.currency_code,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A realistic upstream cart payload: two lines, the second on a product
    /// with no images.
    const CART_JSON: &str = r#"{
        "id": "gid://shopify/Cart/c1-abc",
        "checkoutUrl": "https://boboparty.myshopify.com/cart/c/c1-abc",
        "totalQuantity": 3,
        "cost": {
            "subtotalAmount": { "amount": "125.9", "currencyCode": "HKD" },
            "totalAmount": { "amount": "125.9", "currencyCode": "HKD" }
        },
        "lines": {
            "edges": [
                {
                    "node": {
                        "id": "gid://shopify/CartLine/l1",
                        "quantity": 2,
                        "merchandise": {
                            "id": "gid://shopify/ProductVariant/v1",
                            "title": "Red / 30cm",
                            "price": { "amount": "58.00", "currencyCode": "HKD" },
                            "product": {
                                "title": "乳膠氣球 Latex Balloon",
                                "handle": "latex-balloon",
                                "images": {
                                    "edges": [
                                        { "node": { "url": "https://cdn.shopify.com/balloon.jpg", "altText": null } },
                                        { "node": { "url": "https://cdn.shopify.com/balloon-2.jpg", "altText": "back" } }
                                    ]
                                }
                            }
                        }
                    }
                },
                {
                    "node": {
                        "id": "gid://shopify/CartLine/l2",
                        "quantity": 1,
                        "merchandise": {
                            "id": "gid://shopify/ProductVariant/v2",
                            "title": "Default Title",
                            "price": { "amount": "9.90", "currencyCode": "HKD" },
                            "product": {
                                "title": "派對彩帶 Party Streamer",
                                "handle": "party-streamer",
                                "images": { "edges": [] }
                            }
                        }
                    }
                }
            ]
        }
    }"#;

    fn parse_and_convert() -> Cart {
        let wire_cart: wire::Cart = serde_json::from_str(CART_JSON).unwrap();
        convert_cart(wire_cart)
    }

    #[test]
    fn test_convert_cart_flattens_lines() {
        let cart = parse_and_convert();

        assert_eq!(cart.id, "gid://shopify/Cart/c1-abc");
        assert_eq!(cart.total_quantity, 3);
        assert_eq!(cart.lines.len(), 2);

        let first = cart.lines.first().unwrap();
        assert_eq!(first.merchandise_id, "gid://shopify/ProductVariant/v1");
        assert_eq!(first.title, "Red / 30cm");
        assert_eq!(first.product_title, "乳膠氣球 Latex Balloon");
        assert_eq!(first.product_handle, "latex-balloon");
    }

    #[test]
    fn test_convert_cart_takes_first_image_only() {
        let cart = parse_and_convert();
        assert_eq!(
            cart.lines.first().unwrap().image_url.as_deref(),
            Some("https://cdn.shopify.com/balloon.jpg")
        );
    }

    #[test]
    fn test_convert_cart_tolerates_missing_image() {
        let cart = parse_and_convert();
        assert!(cart.lines.get(1).unwrap().image_url.is_none());
    }

    #[test]
    fn test_convert_cart_preserves_money_verbatim() {
        let cart = parse_and_convert();

        // "125.9" is deliberately not normalized to "125.90"
        assert_eq!(cart.cost.subtotal.amount, "125.9");
        assert_eq!(cart.cost.total.amount, "125.9");
        assert_eq!(cart.lines.first().unwrap().price.amount, "58.00");
        assert_eq!(cart.cost.subtotal.currency_code, "HKD");
    }

    #[test]
    fn test_convert_cart_with_zero_lines() {
        let json = r#"{
            "id": "gid://shopify/Cart/empty",
            "checkoutUrl": "https://boboparty.myshopify.com/cart/c/empty",
            "totalQuantity": 0,
            "cost": {
                "subtotalAmount": { "amount": "0.0", "currencyCode": "HKD" },
                "totalAmount": { "amount": "0.0", "currencyCode": "HKD" }
            },
            "lines": { "edges": [] }
        }"#;

        let wire_cart: wire::Cart = serde_json::from_str(json).unwrap();
        let cart = convert_cart(wire_cart);
        assert_eq!(cart.total_quantity, 0);
        assert!(cart.lines.is_empty());
    }
}
