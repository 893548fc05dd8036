//! Static ISO 3166-1 country table.
//!
//! Countries never change at runtime, so they ship compiled into the binary
//! instead of living in a database table. Coupon country restrictions and
//! shipping zone checks resolve names and codes against this list.

use std::collections::HashMap;
use std::sync::OnceLock;

/// One ISO 3166-1 entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Country {
    /// Two-letter ISO 3166-1 alpha-2 code.
    pub code: &'static str,
    /// English short name.
    pub name: &'static str,
}

impl Country {
    /// Looks up a country by its alpha-2 code, ignoring case.
    #[must_use]
    pub fn by_code(code: &str) -> Option<&'static Country> {
        code_index().get(code.to_ascii_uppercase().as_str()).copied()
    }

    /// Looks up a country by its English name, ignoring case.
    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static Country> {
        name_index().get(name.to_lowercase().as_str()).copied()
    }

    /// Resolves either an alpha-2 code or an English name, ignoring case.
    #[must_use]
    pub fn resolve(input: &str) -> Option<&'static Country> {
        Self::by_code(input).or_else(|| Self::by_name(input))
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

fn code_index() -> &'static HashMap<&'static str, &'static Country> {
    static INDEX: OnceLock<HashMap<&'static str, &'static Country>> = OnceLock::new();
    INDEX.get_or_init(|| COUNTRIES.iter().map(|c| (c.code, c)).collect())
}

fn name_index() -> &'static HashMap<String, &'static Country> {
    static INDEX: OnceLock<HashMap<String, &'static Country>> = OnceLock::new();
    INDEX.get_or_init(|| COUNTRIES.iter().map(|c| (c.name.to_lowercase(), c)).collect())
}

macro_rules! country {
    ($code:literal, $name:literal) => {
        Country {
            code: $code,
            name: $name,
        }
    };
}

/// Every officially assigned ISO 3166-1 alpha-2 country, sorted by name.
pub static COUNTRIES: &[Country] = &[
    country!("AF", "Afghanistan"),
    country!("AX", "Åland Islands"),
    country!("AL", "Albania"),
    country!("DZ", "Algeria"),
    country!("AS", "American Samoa"),
    country!("AD", "Andorra"),
    country!("AO", "Angola"),
    country!("AI", "Anguilla"),
    country!("AQ", "Antarctica"),
    country!("AG", "Antigua and Barbuda"),
    country!("AR", "Argentina"),
    country!("AM", "Armenia"),
    country!("AW", "Aruba"),
    country!("AU", "Australia"),
    country!("AT", "Austria"),
    country!("AZ", "Azerbaijan"),
    country!("BS", "Bahamas"),
    country!("BH", "Bahrain"),
    country!("BD", "Bangladesh"),
    country!("BB", "Barbados"),
    country!("BY", "Belarus"),
    country!("BE", "Belgium"),
    country!("BZ", "Belize"),
    country!("BJ", "Benin"),
    country!("BM", "Bermuda"),
    country!("BT", "Bhutan"),
    country!("BO", "Bolivia"),
    country!("BQ", "Bonaire, Sint Eustatius and Saba"),
    country!("BA", "Bosnia and Herzegovina"),
    country!("BW", "Botswana"),
    country!("BV", "Bouvet Island"),
    country!("BR", "Brazil"),
    country!("IO", "British Indian Ocean Territory"),
    country!("BN", "Brunei Darussalam"),
    country!("BG", "Bulgaria"),
    country!("BF", "Burkina Faso"),
    country!("BI", "Burundi"),
    country!("CV", "Cabo Verde"),
    country!("KH", "Cambodia"),
    country!("CM", "Cameroon"),
    country!("CA", "Canada"),
    country!("KY", "Cayman Islands"),
    country!("CF", "Central African Republic"),
    country!("TD", "Chad"),
    country!("CL", "Chile"),
    country!("CN", "China"),
    country!("CX", "Christmas Island"),
    country!("CC", "Cocos (Keeling) Islands"),
    country!("CO", "Colombia"),
    country!("KM", "Comoros"),
    country!("CG", "Congo"),
    country!("CD", "Congo, Democratic Republic of the"),
    country!("CK", "Cook Islands"),
    country!("CR", "Costa Rica"),
    country!("CI", "Côte d'Ivoire"),
    country!("HR", "Croatia"),
    country!("CU", "Cuba"),
    country!("CW", "Curaçao"),
    country!("CY", "Cyprus"),
    country!("CZ", "Czechia"),
    country!("DK", "Denmark"),
    country!("DJ", "Djibouti"),
    country!("DM", "Dominica"),
    country!("DO", "Dominican Republic"),
    country!("EC", "Ecuador"),
    country!("EG", "Egypt"),
    country!("SV", "El Salvador"),
    country!("GQ", "Equatorial Guinea"),
    country!("ER", "Eritrea"),
    country!("EE", "Estonia"),
    country!("SZ", "Eswatini"),
    country!("ET", "Ethiopia"),
    country!("FK", "Falkland Islands"),
    country!("FO", "Faroe Islands"),
    country!("FJ", "Fiji"),
    country!("FI", "Finland"),
    country!("FR", "France"),
    country!("GF", "French Guiana"),
    country!("PF", "French Polynesia"),
    country!("TF", "French Southern Territories"),
    country!("GA", "Gabon"),
    country!("GM", "Gambia"),
    country!("GE", "Georgia"),
    country!("DE", "Germany"),
    country!("GH", "Ghana"),
    country!("GI", "Gibraltar"),
    country!("GR", "Greece"),
    country!("GL", "Greenland"),
    country!("GD", "Grenada"),
    country!("GP", "Guadeloupe"),
    country!("GU", "Guam"),
    country!("GT", "Guatemala"),
    country!("GG", "Guernsey"),
    country!("GN", "Guinea"),
    country!("GW", "Guinea-Bissau"),
    country!("GY", "Guyana"),
    country!("HT", "Haiti"),
    country!("HM", "Heard Island and McDonald Islands"),
    country!("VA", "Holy See"),
    country!("HN", "Honduras"),
    country!("HK", "Hong Kong"),
    country!("HU", "Hungary"),
    country!("IS", "Iceland"),
    country!("IN", "India"),
    country!("ID", "Indonesia"),
    country!("IR", "Iran"),
    country!("IQ", "Iraq"),
    country!("IE", "Ireland"),
    country!("IM", "Isle of Man"),
    country!("IL", "Israel"),
    country!("IT", "Italy"),
    country!("JM", "Jamaica"),
    country!("JP", "Japan"),
    country!("JE", "Jersey"),
    country!("JO", "Jordan"),
    country!("KZ", "Kazakhstan"),
    country!("KE", "Kenya"),
    country!("KI", "Kiribati"),
    country!("KP", "Korea, Democratic People's Republic of"),
    country!("KR", "Korea, Republic of"),
    country!("KW", "Kuwait"),
    country!("KG", "Kyrgyzstan"),
    country!("LA", "Lao People's Democratic Republic"),
    country!("LV", "Latvia"),
    country!("LB", "Lebanon"),
    country!("LS", "Lesotho"),
    country!("LR", "Liberia"),
    country!("LY", "Libya"),
    country!("LI", "Liechtenstein"),
    country!("LT", "Lithuania"),
    country!("LU", "Luxembourg"),
    country!("MO", "Macao"),
    country!("MG", "Madagascar"),
    country!("MW", "Malawi"),
    country!("MY", "Malaysia"),
    country!("MV", "Maldives"),
    country!("ML", "Mali"),
    country!("MT", "Malta"),
    country!("MH", "Marshall Islands"),
    country!("MQ", "Martinique"),
    country!("MR", "Mauritania"),
    country!("MU", "Mauritius"),
    country!("YT", "Mayotte"),
    country!("MX", "Mexico"),
    country!("FM", "Micronesia"),
    country!("MD", "Moldova"),
    country!("MC", "Monaco"),
    country!("MN", "Mongolia"),
    country!("ME", "Montenegro"),
    country!("MS", "Montserrat"),
    country!("MA", "Morocco"),
    country!("MZ", "Mozambique"),
    country!("MM", "Myanmar"),
    country!("NA", "Namibia"),
    country!("NR", "Nauru"),
    country!("NP", "Nepal"),
    country!("NL", "Netherlands"),
    country!("NC", "New Caledonia"),
    country!("NZ", "New Zealand"),
    country!("NI", "Nicaragua"),
    country!("NE", "Niger"),
    country!("NG", "Nigeria"),
    country!("NU", "Niue"),
    country!("NF", "Norfolk Island"),
    country!("MK", "North Macedonia"),
    country!("MP", "Northern Mariana Islands"),
    country!("NO", "Norway"),
    country!("OM", "Oman"),
    country!("PK", "Pakistan"),
    country!("PW", "Palau"),
    country!("PS", "Palestine, State of"),
    country!("PA", "Panama"),
    country!("PG", "Papua New Guinea"),
    country!("PY", "Paraguay"),
    country!("PE", "Peru"),
    country!("PH", "Philippines"),
    country!("PN", "Pitcairn"),
    country!("PL", "Poland"),
    country!("PT", "Portugal"),
    country!("PR", "Puerto Rico"),
    country!("QA", "Qatar"),
    country!("RE", "Réunion"),
    country!("RO", "Romania"),
    country!("RU", "Russian Federation"),
    country!("RW", "Rwanda"),
    country!("BL", "Saint Barthélemy"),
    country!("SH", "Saint Helena, Ascension and Tristan da Cunha"),
    country!("KN", "Saint Kitts and Nevis"),
    country!("LC", "Saint Lucia"),
    country!("MF", "Saint Martin (French part)"),
    country!("PM", "Saint Pierre and Miquelon"),
    country!("VC", "Saint Vincent and the Grenadines"),
    country!("WS", "Samoa"),
    country!("SM", "San Marino"),
    country!("ST", "Sao Tome and Principe"),
    country!("SA", "Saudi Arabia"),
    country!("SN", "Senegal"),
    country!("RS", "Serbia"),
    country!("SC", "Seychelles"),
    country!("SL", "Sierra Leone"),
    country!("SG", "Singapore"),
    country!("SX", "Sint Maarten (Dutch part)"),
    country!("SK", "Slovakia"),
    country!("SI", "Slovenia"),
    country!("SB", "Solomon Islands"),
    country!("SO", "Somalia"),
    country!("ZA", "South Africa"),
    country!("GS", "South Georgia and the South Sandwich Islands"),
    country!("SS", "South Sudan"),
    country!("ES", "Spain"),
    country!("LK", "Sri Lanka"),
    country!("SD", "Sudan"),
    country!("SR", "Suriname"),
    country!("SJ", "Svalbard and Jan Mayen"),
    country!("SE", "Sweden"),
    country!("CH", "Switzerland"),
    country!("SY", "Syrian Arab Republic"),
    country!("TW", "Taiwan"),
    country!("TJ", "Tajikistan"),
    country!("TZ", "Tanzania"),
    country!("TH", "Thailand"),
    country!("TL", "Timor-Leste"),
    country!("TG", "Togo"),
    country!("TK", "Tokelau"),
    country!("TO", "Tonga"),
    country!("TT", "Trinidad and Tobago"),
    country!("TN", "Tunisia"),
    country!("TR", "Türkiye"),
    country!("TM", "Turkmenistan"),
    country!("TC", "Turks and Caicos Islands"),
    country!("TV", "Tuvalu"),
    country!("UG", "Uganda"),
    country!("UA", "Ukraine"),
    country!("AE", "United Arab Emirates"),
    country!("GB", "United Kingdom"),
    country!("US", "United States"),
    country!("UM", "United States Minor Outlying Islands"),
    country!("UY", "Uruguay"),
    country!("UZ", "Uzbekistan"),
    country!("VU", "Vanuatu"),
    country!("VE", "Venezuela"),
    country!("VN", "Viet Nam"),
    country!("VG", "Virgin Islands (British)"),
    country!("VI", "Virgin Islands (U.S.)"),
    country!("WF", "Wallis and Futuna"),
    country!("EH", "Western Sahara"),
    country!("YE", "Yemen"),
    country!("ZM", "Zambia"),
    country!("ZW", "Zimbabwe"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_covers_iso_3166() {
        assert!(COUNTRIES.len() >= 240, "table lost entries");
    }

    #[test]
    fn test_codes_are_unique_two_letter_uppercase() {
        let mut seen = HashSet::new();
        for country in COUNTRIES {
            assert_eq!(country.code.len(), 2, "{}", country.code);
            assert_eq!(country.code, country.code.to_ascii_uppercase());
            assert!(seen.insert(country.code), "duplicate code {}", country.code);
        }
    }

    #[test]
    fn test_by_code_ignores_case() {
        let us = Country::by_code("us").expect("US exists");
        assert_eq!(us.name, "United States");
        assert!(Country::by_code("XX").is_none());
    }

    #[test]
    fn test_by_name_ignores_case() {
        let fr = Country::by_name("fRaNcE").expect("France exists");
        assert_eq!(fr.code, "FR");
        assert!(Country::by_name("Atlantis").is_none());
    }

    #[test]
    fn test_resolve_accepts_code_or_name() {
        assert_eq!(Country::resolve("DE").map(|c| c.name), Some("Germany"));
        assert_eq!(Country::resolve("germany").map(|c| c.code), Some("DE"));
    }
}
