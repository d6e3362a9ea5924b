use business_map_business_models::{BusinessRecord, MapType};

#[allow(clippy::too_many_arguments)]
pub fn record(
    id: &str,
    name: &str,
    map_type: MapType,
    category: &str,
    source: &str,
    district: &str,
    sub_district: &str,
    local_unit: &str,
) -> BusinessRecord {
    BusinessRecord {
        id: id.to_string(),
        name: name.to_string(),
        address: format!("Jl. {name} No. {id}"),
        map_type,
        category: category.to_string(),
        category_code: format!("47{id}"),
        region: "Kota Medan".to_string(),
        district: district.to_string(),
        sub_district: sub_district.to_string(),
        local_unit: local_unit.to_string(),
        census_block: format!("B{local_unit}"),
        latitude: 3.5,
        longitude: 98.6,
        data_source: source.to_string(),
        phone: None,
    }
}

/// Six records spread over two districts, both map types and two sources.
#[rustfmt::skip]
pub fn records() -> Vec<BusinessRecord> {
    vec![
        record("1", "Warung Sate", MapType::Prelist, "Makanan", "Survei", "Medan Baru", "Darat", "0001"),
        record("2", "apotek Sehat", MapType::Prelist, "Kesehatan", "Survei", "Medan Baru", "Babura", "0002"),
        record("3", "Bengkel Jaya", MapType::Listing, "Otomotif", "Survei", "Medan Kota", "Teladan", "0003"),
        record("4", "Toko Buku", MapType::Prelist, "Makanan", "Registrasi", "Medan Baru", "Darat", "0004"),
        record("5", "Kedai Kopi", MapType::Listing, "Makanan", "Registrasi", "Medan Kota", "Mesjid", "0005"),
        record("6", "Warung Nasi", MapType::Prelist, "Makanan", "Survei", "Medan Baru", "Darat", "0001"),
    ]
}
