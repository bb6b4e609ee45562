use lettings_store::prelude::*;

/// Postal address of a letting.
#[derive(Model, FromRow, Clone, Debug, PartialEq)]
#[model(table = "lettings_address", display = "{number} {street}")]
pub struct Address {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,

    #[field(min = 1, max = 9999)]
    pub number: Integer,

    #[field(size = 64)]
    pub street: String,

    #[field(size = 64)]
    pub city: String,

    /// Two letter state code.
    #[field(size = 2, min_length = 2)]
    pub state: String,

    #[field(min = 1, max = 99999)]
    pub zip_code: Integer,

    /// ISO 3166 alpha-3.
    #[field(size = 3, min_length = 3)]
    pub country_iso_code: String,
}

/// A property listed for rent. Each address is used by at most one letting;
/// removing the address removes the letting with it.
#[derive(Model, FromRow, Clone, Debug, PartialEq)]
#[model(table = "lettings_letting", display = "{title}")]
pub struct Letting {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,

    #[field(size = 256)]
    pub title: String,

    #[field(unique = true, foreign_key = "lettings_address.id", on_delete = "cascade")]
    pub address: Integer,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            number: 123,
            street: "Main Street".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: 62701,
            country_iso_code: "USA".into(),
            ..Default::default()
        }
    }

    #[test]
    fn address_displays_number_and_street() {
        assert_eq!(address().to_string(), "123 Main Street");
        assert!(address().clean_fields().is_ok());
    }

    #[test]
    fn address_bounds() {
        let errors = Address {
            number: 10000,
            zip_code: 100000,
            state: "I".into(),
            ..address()
        }
        .clean_fields()
        .unwrap_err();
        assert!(errors.has("number"));
        assert!(errors.has("zip_code"));
        assert_eq!(
            errors.get("state"),
            ["Ensure this value has at least 2 characters (it has 1)."]
        );
        assert!(!errors.has("street"));
    }

    #[test]
    fn country_code_needs_three_letters() {
        let errors = Address {
            country_iso_code: "US".into(),
            ..address()
        }
        .clean_fields()
        .unwrap_err();
        assert!(errors.has("country_iso_code"));
    }

    #[test]
    fn letting_displays_title() {
        let letting = Letting {
            title: "Beautiful Chicago Apartment".into(),
            address: 1,
            ..Default::default()
        };
        assert_eq!(letting.to_string(), "Beautiful Chicago Apartment");
        assert!(letting.clean_fields().is_ok());
    }
}
