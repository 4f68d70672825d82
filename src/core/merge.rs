use crate::domain::model::{EnrichmentMap, ListingRecord, OutputRow};
use crate::utils::error::Result;

/// 依上游清單順序合併，缺少的補充資料以空字串填入
pub fn merge_rows(listings: &[ListingRecord], enrichment: &EnrichmentMap) -> Vec<OutputRow> {
    listings
        .iter()
        .map(|listing| OutputRow::from_parts(listing, enrichment.lookup(&listing.external_code)))
        .collect()
}

/// Serializes rows as CSV: header always present, comma delimited, CRLF terminated.
pub fn rows_to_csv(rows: &[OutputRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    // 自行寫入標題列，零筆資料時也要有標題
    writer.write_record(OutputRow::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EnrichmentResult;

    fn listing(code: &str, name: &str) -> ListingRecord {
        ListingRecord {
            external_code: code.to_string(),
            name: name.to_string(),
            status_code: "5".to_string(),
            closing_date: "2024-01-01".to_string(),
        }
    }

    fn csv_string(rows: &[OutputRow]) -> String {
        String::from_utf8(rows_to_csv(rows).unwrap()).unwrap()
    }

    #[test]
    fn test_end_to_end_row() {
        let listings = vec![listing("123", "Obra A")];
        let enrichment: EnrichmentMap = [(
            "123".to_string(),
            EnrichmentResult {
                status: "Adjudicada".to_string(),
                description: crate::adapters::html::normalize_whitespace(
                    "Construcción  de   puente",
                ),
            },
        )]
        .into_iter()
        .collect();

        let output = csv_string(&merge_rows(&listings, &enrichment));

        assert_eq!(
            output,
            "CodigoExterno,Nombre,CodigoEstado,FechaCierre,Estado,Descripcion\r\n\
             123,Obra A,5,2024-01-01,Adjudicada,Construcción de puente\r\n"
        );
    }

    #[test]
    fn test_missing_entry_defaults_to_empty_fields() {
        let listings = vec![listing("A", "Uno"), listing("B", "Dos")];
        let enrichment: EnrichmentMap = [(
            "A".to_string(),
            EnrichmentResult {
                status: "Publicada".to_string(),
                description: "Algo".to_string(),
            },
        )]
        .into_iter()
        .collect();

        let rows = merge_rows(&listings, &enrichment);

        assert_eq!(rows[1].external_code, "B");
        assert_eq!(rows[1].status, "");
        assert_eq!(rows[1].description, "");
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let listings = vec![
            listing("C", "tres"),
            listing("A", "uno"),
            listing("C", "tres otra vez"),
            listing("B", "dos"),
        ];

        let rows = merge_rows(&listings, &EnrichmentMap::new());

        let codes: Vec<&str> = rows.iter().map(|r| r.external_code.as_str()).collect();
        assert_eq!(codes, vec!["C", "A", "C", "B"]);
        assert_eq!(rows[2].name, "tres otra vez");
    }

    #[test]
    fn test_empty_listing_writes_header_only() {
        assert_eq!(
            csv_string(&[]),
            "CodigoExterno,Nombre,CodigoEstado,FechaCierre,Estado,Descripcion\r\n"
        );
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_quoted() {
        let listings = vec![listing("X", "Compra de \"insumos\", lote 2")];

        let output = csv_string(&merge_rows(&listings, &EnrichmentMap::new()));

        assert!(output.ends_with("X,\"Compra de \"\"insumos\"\", lote 2\",5,2024-01-01,,\r\n"));
    }
}
