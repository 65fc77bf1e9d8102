use serde::{Deserialize, Serialize};

use super::blank_as_none;

wire_enum! {
    /// Dominant ground cover around the address.
    SoilType {
        Vegetation => "VEGETACAO" | "VEGETAÇÃO",
        Soil => "TERRA",
        Asphalt => "ASFALTO",
    }
}

wire_enum! {
    /// Street height relative to its surroundings.
    StreetElevation {
        Level => "NIVEL" | "NÍVEL",
        Below => "ABAIXO",
        Above => "ACIMA",
    }
}

wire_enum! {
    /// `ALVERNARIA` is a misspelling still produced by the registration form.
    ConstructionType {
        Wood => "MADEIRA",
        Masonry => "ALVENARIA" | "ALVERNARIA",
        Mixed => "MISTA",
    }
}

wire_enum! {
    /// Risk classification of the neighborhood.
    RiskLevel {
        Low => "BAIXO",
        Medium => "MEDIO" | "MÉDIO",
        High => "ALTO",
    }
}

/// Address embedded in registrations and incident reports.
///
/// Every field is optional here: which ones are mandatory depends on the
/// operation, and the upstream service owns the authoritative validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "logradouro", default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(rename = "bairro", default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,

    #[serde(rename = "cep", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(
        rename = "tipoSolo",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub soil_type: Option<SoilType>,

    #[serde(
        rename = "altitudeRua",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub street_elevation: Option<StreetElevation>,

    #[serde(
        rename = "tipoConstrucao",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub construction_type: Option<ConstructionType>,

    #[serde(
        rename = "bairroRisco",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_level: Option<RiskLevel>,

    #[serde(rename = "proximoCorrego", default, skip_serializing_if = "Option::is_none")]
    pub near_waterway: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enum_fields_are_upper_cased_on_the_way_out() {
        let address: Address = serde_json::from_value(json!({
            "logradouro": "Rua das Flores, 10",
            "bairro": "Centro",
            "cep": "01001000",
            "tipoSolo": "vegetacao",
            "altitudeRua": "Abaixo",
            "tipoConstrucao": "alvernaria",
            "bairroRisco": "médio",
            "proximoCorrego": true
        }))
        .unwrap();

        assert_eq!(address.construction_type, Some(ConstructionType::Masonry));
        assert_eq!(
            serde_json::to_value(&address).unwrap(),
            json!({
                "logradouro": "Rua das Flores, 10",
                "bairro": "Centro",
                "cep": "01001000",
                "tipoSolo": "VEGETACAO",
                "altitudeRua": "ABAIXO",
                "tipoConstrucao": "ALVENARIA",
                "bairroRisco": "MEDIO",
                "proximoCorrego": true
            })
        );
    }

    #[test]
    fn blank_enum_values_are_absent() {
        let address: Address =
            serde_json::from_value(json!({ "tipoSolo": "", "bairroRisco": null })).unwrap();
        assert_eq!(address.soil_type, None);
        assert_eq!(address.risk_level, None);
        assert_eq!(serde_json::to_value(&address).unwrap(), json!({}));
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let err = serde_json::from_value::<Address>(json!({ "tipoSolo": "lava" })).unwrap_err();
        assert!(err.to_string().contains("SoilType"));
    }
}
