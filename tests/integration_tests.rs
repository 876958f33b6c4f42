//! # تست‌های Integration (بدون HTTP)
//!
//! تست API عمومی کتابخانه: config، خطاها، مدل‌ها و utils.
//!
//! ## اجرای تست‌ها:
//! ```bash
//! cargo test                                  # همه تست‌ها
//! cargo test --lib                            # فقط تست‌های unit
//! cargo test --test integration_tests         # فقط این فایل
//! cargo test --test reservation_workflow      # سناریوهای رزرو
//! cargo test --test api_tests                 # تست‌های HTTP
//! ```

// =====================================
// تست‌های Utils
// =====================================
mod utils_tests {
    use chrono::{Datelike, Utc};
    use parking_backend::utils;

    #[test]
    fn test_parse_calendar_date_accepts_valid_dates() {
        let date = utils::parse_calendar_date("2024-06-01").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 6, 1));

        // کبیسه
        assert!(utils::parse_calendar_date("2024-02-29").is_ok());
    }

    #[test]
    fn test_parse_calendar_date_rejects_bad_input() {
        for raw in ["2024-6-1", "01-06-2024", "2024/06/01", "2023-02-29", "2024-13-01", "", "tomorrow"] {
            let err = utils::parse_calendar_date(raw).unwrap_err();
            assert_eq!(err.to_string(), utils::INVALID_DATE_MESSAGE, "input: {raw:?}");
        }
    }

    #[test]
    fn test_otp_shape() {
        let otp = utils::generate_otp();
        assert_eq!(otp.len(), utils::OTP_LENGTH);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_expiry_is_in_the_future() {
        let expires = utils::expires_at_from_minutes(60).unwrap();
        let delta = expires - Utc::now();
        assert!(delta.num_minutes() >= 59 && delta.num_minutes() <= 60);
    }

    #[test]
    fn test_mask_email_hides_local_part() {
        let masked = utils::mask_email("alice@example.com");
        assert!(masked.ends_with("@example.com"));
        assert!(!masked.contains("alice"));
    }
}

// =====================================
// تست‌های Config
// =====================================
mod config_tests {
    use parking_backend::config::{Config, ConfigBuilder, Environment};

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.jwt_expiration_hours, 6);
        assert!(config.environment.is_development());
    }

    #[test]
    fn test_validation_production_secret() {
        let config = ConfigBuilder::new()
            .environment(Environment::Production)
            .jwt_secret("change-me-in-production")
            .build();
        assert!(config.validate().is_err());

        let config = ConfigBuilder::new()
            .environment(Environment::Production)
            .jwt_secret("my-super-secret-key-123")
            .build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_expiration_is_rejected() {
        let result = ConfigBuilder::new().jwt_expiration_hours(0).build_validated();
        assert!(result.is_err());
    }
}

// =====================================
// تست‌های Error
// =====================================
mod error_tests {
    use axum::http::StatusCode;
    use parking_backend::error::AppError;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Internal("connection refused at 10.0.0.3".to_string());
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::NotFound("Reservation not found".to_string());
        assert_eq!(err.public_message(), "Reservation not found");
    }
}

// =====================================
// تست‌های Models
// =====================================
mod model_tests {
    use chrono::Utc;
    use parking_backend::models::{
        Claims, Id, Pagination, PaginationInfo, ReservationStatus, Role, SortOrder,
    };

    #[test]
    fn test_id_generation() {
        let id1 = Id::new();
        let id2 = Id::new();

        assert_ne!(id1.as_str(), id2.as_str());
        assert_eq!(id1.as_str().len(), 36);
    }

    #[test]
    fn test_id_parse_error_names_entity() {
        let err = Id::parse("not-a-uuid", "parking slot").unwrap_err();
        assert_eq!(err.to_string(), "Invalid parking slot ID format");
    }

    #[test]
    fn test_pagination_defaults_and_clamping() {
        let default = Pagination::default();
        assert_eq!(default.page(), 1);
        assert_eq!(default.limit(), 10);
        assert_eq!(default.offset(), 0);
        assert_eq!(default.order(), SortOrder::Asc);

        let large = Pagination {
            page: Some(0),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(large.page(), 1);
        assert_eq!(large.limit(), 100);

        let third = Pagination {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(third.offset(), 20);
    }

    #[test]
    fn test_pagination_info() {
        let pagination = Pagination {
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        };
        let info = PaginationInfo::new(&pagination, 35);

        assert_eq!(info.total, 35);
        assert_eq!(info.page, 2);
        assert_eq!(info.total_pages, 4);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let pagination = Pagination {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(pagination.search_term(), None);
    }

    #[test]
    fn test_reservation_status_transitions() {
        use ReservationStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        for terminal in [Approved, Rejected] {
            assert!(terminal.is_terminal());
            for next in [Pending, Approved, Rejected] {
                assert!(!terminal.can_transition_to(next));
            }
        }

        assert!(Pending.is_active() && Approved.is_active());
        assert!(!Rejected.is_active());
    }

    #[test]
    fn test_claims_expiration() {
        let claims = Claims::new("user1", Role::User, 1).unwrap();
        assert!(!claims.is_expired());

        let expired = Claims {
            exp: Utc::now().timestamp() - 3600,
            iat: Utc::now().timestamp() - 7200,
            ..claims
        };
        assert!(expired.is_expired());
    }
}

// =====================================
// Property-Based Tests
// =====================================
mod property_tests {
    use chrono::{Duration, NaiveDate};
    use parking_backend::utils;
    use proptest::prelude::*;

    proptest! {
        /// هر تاریخ واقعی که با `%Y-%m-%d` فرمت بشه دوباره parse میشه
        #[test]
        fn formatted_dates_parse_back(offset in 0i64..40_000) {
            let base = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            let date = base + Duration::days(offset);
            let parsed = utils::parse_calendar_date(&date.format("%Y-%m-%d").to_string());
            prop_assert_eq!(parsed.ok(), Some(date));
        }

        /// رشته‌هایی که الگوی تاریخ ندارن هیچوقت قبول نمیشن
        #[test]
        fn garbage_is_rejected(raw in "[a-zA-Z ]{0,12}") {
            prop_assert!(utils::parse_calendar_date(&raw).is_err());
        }
    }
}
