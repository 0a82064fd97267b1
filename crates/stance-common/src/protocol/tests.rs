//! Tests for the protocol module
//!
//! These tests pin the wire shape of posture calls, verify ID generation and
//! exercise the response envelope.

#[cfg(test)]
mod tests {
    use super::super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_transition_request_wire_shape() {
        let req = Request::new(PostureCall::GoToPosture {
            posture: "Sit".to_string(),
            speed: Speed::default(),
        });
        let wire = serde_json::to_value(&req).unwrap();

        assert_eq!(wire["id"], json!(req.id));
        assert_eq!(wire["method"], json!("go_to_posture"));
        assert_eq!(wire["params"]["posture"], json!("Sit"));
        assert_eq!(wire["params"]["speed"], json!(0.5));
    }

    #[test]
    fn test_parameterless_call_carries_tag_only() {
        let req = Request::new(PostureCall::GetPostureList);
        let wire = serde_json::to_value(&req).unwrap();

        assert_eq!(wire["method"], json!("get_posture_list"));
        assert!(wire.get("params").is_none());
    }

    #[test]
    fn test_request_decodes_from_wire_json() {
        let wire = json!({
            "id": 7,
            "method": "go_to_posture",
            "params": {"posture": "Crouch", "speed": 0.5}
        });
        let req: Request = serde_json::from_value(wire).unwrap();

        assert_eq!(req.id, 7);
        assert_eq!(
            req.call,
            PostureCall::GoToPosture {
                posture: "Crouch".to_string(),
                speed: Speed::default(),
            }
        );
    }

    #[test]
    fn test_stop_move_decodes_without_params() {
        let wire = json!({"id": 3, "method": "stop_move"});
        let req: Request = serde_json::from_value(wire).unwrap();
        assert_eq!(req.call, PostureCall::StopMove);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let wire = json!({"id": 1, "method": "walk_to", "params": {}});
        assert!(serde_json::from_value::<Request>(wire).is_err());
    }

    #[test]
    fn test_out_of_range_speed_is_rejected_on_decode() {
        let wire = json!({
            "id": 2,
            "method": "go_to_posture",
            "params": {"posture": "Sit", "speed": 5.0}
        });
        assert!(serde_json::from_value::<Request>(wire).is_err());
    }

    #[test]
    fn test_request_id_uniqueness() {
        let ids: HashSet<_> = (0..1000)
            .map(|_| Request::new(PostureCall::GetPosture).id)
            .collect();
        assert_eq!(ids.len(), 1000, "All request IDs should be unique");
    }

    #[test]
    fn test_response_ok() {
        let resp = Response::ok(123, json!(["Stand", "Sit"]));
        assert_eq!(resp.id, 123);
        assert_eq!(resp.result, Some(json!(["Stand", "Sit"])));
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_response_fault() {
        let resp = Response::fault(456, "unknown posture");
        assert_eq!(resp.id, 456);
        assert_eq!(resp.error, Some("unknown posture".to_string()));
        assert!(resp.result.is_none());
    }

    #[test]
    fn test_into_result_surfaces_faults() {
        let err = Response::fault(1, "unknown posture \"Moonwalk\"")
            .into_result()
            .unwrap_err();
        match err {
            StanceError::Fault(message) => assert_eq!(message, "unknown posture \"Moonwalk\""),
            other => panic!("expected a fault, got {:?}", other),
        }
    }

    #[test]
    fn test_into_result_treats_missing_result_as_null() {
        let resp: Response = serde_json::from_value(json!({"id": 9})).unwrap();
        assert_eq!(resp.into_result().unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_request_serialization_roundtrip() {
        let req = Request::new(PostureCall::GoToPosture {
            posture: "StandInit".to_string(),
            speed: Speed::new(0.75).unwrap(),
        });
        let serialized = serde_json::to_value(&req).unwrap();
        let deserialized: Request = serde_json::from_value(serialized).unwrap();
        assert_eq!(req, deserialized);
    }

    #[test]
    fn test_response_serialization_roundtrip() {
        let resp = Response::ok(1, json!("Stand"));
        let serialized = serde_json::to_value(&resp).unwrap();
        let deserialized: Response = serde_json::from_value(serialized).unwrap();
        assert_eq!(resp, deserialized);
    }
}
