//! GraphQL operation documents for the Storefront API cart contract.
//!
//! Every operation selects the same cart snapshot via `CartFragment`, so a
//! mutation response always carries the full fresh aggregate.

use std::sync::LazyLock;

/// Shared cart selection set.
///
/// `lines(first: 100)` is far above anything a party-supplies cart reaches;
/// the proxy treats the page as the whole cart.
const CART_FRAGMENT: &str = r"
fragment CartFragment on Cart {
  id
  checkoutUrl
  totalQuantity
  cost {
    subtotalAmount {
      amount
      currencyCode
    }
    totalAmount {
      amount
      currencyCode
    }
  }
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        merchandise {
          ... on ProductVariant {
            id
            title
            price {
              amount
              currencyCode
            }
            product {
              title
              handle
              images(first: 1) {
                edges {
                  node {
                    url
                    altText
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
";

fn with_cart_fragment(operation: &str) -> String {
    format!("{operation}\n{CART_FRAGMENT}")
}

pub static CREATE_CART: LazyLock<String> = LazyLock::new(|| {
    with_cart_fragment(
        r"
mutation CreateCart($lines: [CartLineInput!]) {
  cartCreate(input: { lines: $lines }) {
    cart {
      ...CartFragment
    }
    userErrors {
      message
    }
  }
}",
    )
});

pub static GET_CART: LazyLock<String> = LazyLock::new(|| {
    with_cart_fragment(
        r"
query GetCart($cartId: ID!) {
  cart(id: $cartId) {
    ...CartFragment
  }
}",
    )
});

pub static ADD_LINES: LazyLock<String> = LazyLock::new(|| {
    with_cart_fragment(
        r"
mutation AddCartLines($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFragment
    }
    userErrors {
      message
    }
  }
}",
    )
});

pub static UPDATE_LINES: LazyLock<String> = LazyLock::new(|| {
    with_cart_fragment(
        r"
mutation UpdateCartLines($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFragment
    }
    userErrors {
      message
    }
  }
}",
    )
});

pub static REMOVE_LINES: LazyLock<String> = LazyLock::new(|| {
    with_cart_fragment(
        r"
mutation RemoveCartLines($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...CartFragment
    }
    userErrors {
      message
    }
  }
}",
    )
});
