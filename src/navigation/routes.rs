//! Route table and path matching.

pub const HOME: &str = "/";
pub const BILLS: &str = "/bills";
pub const ADD_BILL: &str = "/add-bill";
pub const MY_BILLS: &str = "/my-bills";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";

pub fn bill_details(id: &str) -> String {
    format!("{BILLS}/{id}")
}

/// Views reachable through the router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Bills,
    BillDetails { id: String },
    AddBill,
    MyBills,
    Login,
    Register,
    NotFound,
}

impl Route {
    /// Resolves a location; query string, fragment and trailing slashes are
    /// ignored.
    pub fn parse(location: &str) -> Self {
        let segments = segments(location);
        match segments.as_slice() {
            [] => Self::Home,
            ["bills"] => Self::Bills,
            ["bills", id] => Self::BillDetails { id: (*id).to_string() },
            ["add-bill"] => Self::AddBill,
            ["my-bills"] => Self::MyBills,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            _ => Self::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => HOME.to_string(),
            Self::Bills => BILLS.to_string(),
            Self::BillDetails { id } => bill_details(id),
            Self::AddBill => ADD_BILL.to_string(),
            Self::MyBills => MY_BILLS.to_string(),
            Self::Login => LOGIN.to_string(),
            Self::Register => REGISTER.to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }
}

/// Path without query string or fragment, normalized to a leading slash and
/// no trailing slash.
pub fn normalize(location: &str) -> String {
    let joined = segments(location).join("/");
    format!("/{joined}")
}

pub(crate) fn segments(location: &str) -> Vec<&str> {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_route() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/bills"), Route::Bills);
        assert_eq!(
            Route::parse("/bills/65f0c2"),
            Route::BillDetails {
                id: "65f0c2".to_string()
            }
        );
        assert_eq!(Route::parse("/add-bill"), Route::AddBill);
        assert_eq!(Route::parse("/my-bills"), Route::MyBills);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/register"), Route::Register);
        assert_eq!(Route::parse("/bills/1/edit"), Route::NotFound);
        assert_eq!(Route::parse("/cart"), Route::NotFound);
    }

    #[test]
    fn ignores_query_fragment_and_trailing_slash() {
        assert_eq!(Route::parse("/bills/?category=Gas"), Route::Bills);
        assert_eq!(Route::parse("/my-bills#top"), Route::MyBills);
        assert_eq!(normalize("/add-bill/?x=1"), "/add-bill");
        assert_eq!(normalize("//bills//42/"), "/bills/42");
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn path_round_trips_through_parse() {
        let route = Route::BillDetails {
            id: "abc".to_string(),
        };
        assert_eq!(route.path(), "/bills/abc");
        assert_eq!(Route::parse(&route.path()), route);
    }
}
