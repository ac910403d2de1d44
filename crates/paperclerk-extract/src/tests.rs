//! Integration tests for the extraction pipeline

#[cfg(test)]
mod tests {
    use crate::{merge_and_validate, recover_object};
    use paperclerk_domain::NotePolicy;
    use serde_json::{json, Value};

    const DOC_TEXT: &str = "臺灣臺北地方法院 函\n\
        發文日期：113年7月1日\n\
        發文字號：北院民執字第1130012345號\n\
        主旨：請查復債務人王小明（A123456789）於 貴公司之保單資料。\n\
        說明：一、復 貴公司來文日期：113年6月20日函。\n\
        承辦人：陳志明 電話：(02)2345-6789轉123\n";

    #[test]
    fn test_full_pipeline_from_model_response() {
        // The model answered with prose around a fenced object, dates and
        // phone omitted, validity flag fabricated.
        let response = "抽取結果如下：\n```json\n{\n  \"agency\": \"臺灣臺北地方法院\",\n  \"targets\": [{\"name\": \"王小明\", \"tw_id\": \"A123456789\", \"id_valid\": false}],\n  \"class_specific\": \"{\\\"query_mode\\\":\\\"person\\\"}\"\n}\n```\n";

        let raw = recover_object(response).unwrap();
        let record = merge_and_validate(
            Value::Object(raw),
            DOC_TEXT,
            "保單查詢",
            &NotePolicy::default(),
        )
        .unwrap();

        assert_eq!(record.agency.as_deref(), Some("臺灣臺北地方法院"));
        assert!(record.targets[0].id_valid);
        assert_eq!(record.doc_date.as_deref(), Some("2024-07-01"));
        assert_eq!(record.reference_date.as_deref(), Some("2024-06-20"));
        assert_eq!(record.doc_no.as_deref(), Some("北院民執字第1130012345號"));
        assert_eq!(record.officer_name.as_deref(), Some("陳志明"));
        assert_eq!(record.contact_phone.as_deref(), Some("02-23456789#123"));
        assert_eq!(
            record.note(),
            Some("經查本公司承保資料，查詢結果詳如說明段。（依利害關係人身分資料查詢）")
        );
    }

    #[test]
    fn test_model_fields_survive_merge_untouched() {
        let response = r#"{"doc_no": "模型字第1號", "doc_date": "2024-01-02", "contact_phone": "07-9999999"}"#;
        let raw = recover_object(response).unwrap();
        let record = merge_and_validate(
            Value::Object(raw),
            DOC_TEXT,
            "其他",
            &NotePolicy::default(),
        )
        .unwrap();

        assert_eq!(record.doc_no.as_deref(), Some("模型字第1號"));
        assert_eq!(record.doc_date.as_deref(), Some("2024-01-02"));
        assert_eq!(record.contact_phone.as_deref(), Some("07-9999999"));
        // Blanks are still backfilled around the model's answers.
        assert_eq!(record.officer_role.as_deref(), Some("承辦人"));
    }

    #[test]
    fn test_unrecoverable_response_is_the_only_fatal_path() {
        assert!(recover_object("模型僅回覆了說明文字，完全沒有 JSON。").is_err());

        // Whereas an empty-but-valid object merges fine against any text.
        let record = merge_and_validate(
            json!({}),
            "亂碼＃＊〉不含任何欄位",
            "其他",
            &NotePolicy::default(),
        )
        .unwrap();
        assert_eq!(record.doc_no, None);
        assert!(record.targets.is_empty());
    }
}
