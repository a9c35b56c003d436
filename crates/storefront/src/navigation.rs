//! Places a storefront flow can send the user next.

use url::Url;

/// A page the user is sent to after an action completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Login entry point (session missing or expired).
    Login,
    /// The user's order history.
    OrderHistory,
    /// Checkout page.
    Checkout,
    /// Address book management.
    ManageAddresses,
}

impl Destination {
    /// Path of the page on the web storefront.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::OrderHistory => "/dashboard/user/my-orders",
            Self::Checkout => "/checkout",
            Self::ManageAddresses => "/dashboard/user/profile/address",
        }
    }

    /// Absolute URL of the page under a storefront base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the joined URL does not parse.
    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(self.path())
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
