//! # سناریوهای workflow رزرو
//!
//! تست سرویس‌ها روی دیتابیس in-memory با `MemoryMailer`،
//! بدون لایه HTTP.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;

use parking_backend::{
    config::ConfigBuilder,
    database::{
        Database, Repository, ReservationRepository, UserRepository, VehicleRepository,
    },
    error::{AppError, Result},
    models::{
        ApproveReservationRequest, CreateParkingSlotRequest, CreateReservationRequest,
        CreateVehicleRequest, ForgotPasswordRequest, hash_secret, Id, LoginRequest, ParkingSlot,
        RegisterRequest, ReservationStatus, ResetPasswordRequest, Vehicle,
    },
    notifications::{Email, Mailer, MemoryMailer, Notifier},
    services::{
        AppState, CurrentUser, DUPLICATE_RESERVATION_MESSAGE, NOT_PENDING_MESSAGE,
        SLOT_TAKEN_MESSAGE, VEHICLE_NOT_YOURS_MESSAGE,
    },
};

// =====================================
// Helpers
// =====================================
/// mailer ای که همیشه خطا میده
struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: Email) -> Result<()> {
        Err(AppError::Mail("smtp unreachable".to_string()))
    }
}

/// mailer ای که هیچوقت جواب نمیده (سرور SMTP گیر کرده)
struct StalledMailer;

#[async_trait]
impl Mailer for StalledMailer {
    async fn send(&self, _email: Email) -> Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

async fn setup_with_notifier(notifier: Notifier) -> AppState {
    let db = Database::in_memory().await.unwrap();
    let config = ConfigBuilder::new()
        .jwt_secret("workflow-test-secret")
        .build();

    AppState::with_notifier(db, config, notifier)
}

async fn setup_with(mailer: Arc<dyn Mailer>) -> AppState {
    setup_with_notifier(Notifier::new(mailer)).await
}

async fn setup() -> (AppState, MemoryMailer) {
    let mailer = MemoryMailer::new();
    let state = setup_with(Arc::new(mailer.clone())).await;
    (state, mailer)
}

async fn register(state: &AppState, email: &str) -> CurrentUser {
    let user = state
        .auth_service
        .register(RegisterRequest {
            email: email.to_string(),
            password: "secret123".to_string(),
            first_name: "Test".to_string(),
            last_name: "Driver".to_string(),
            phone_number: None,
        })
        .await
        .unwrap();

    CurrentUser {
        id: Id::parse(&user.id, "user").unwrap(),
        role: user.role,
    }
}

async fn admin(state: &AppState) -> CurrentUser {
    let seed = ConfigBuilder::new()
        .admin("admin@parking.com", "admin123")
        .build()
        .admin
        .unwrap();
    let user = state.auth_service.ensure_admin(&seed).await.unwrap();

    CurrentUser {
        id: Id::parse(&user.id, "user").unwrap(),
        role: user.role,
    }
}

async fn vehicle(state: &AppState, owner: &CurrentUser, plate: &str) -> Vehicle {
    state
        .vehicle_service
        .create(
            owner,
            CreateVehicleRequest {
                plate: plate.to_string(),
                model: "Toyota Corolla".to_string(),
            },
        )
        .await
        .unwrap()
}

async fn slot(state: &AppState, code: &str) -> ParkingSlot {
    state
        .parking_slot_service
        .create(CreateParkingSlotRequest {
            slot_code: code.to_string(),
        })
        .await
        .unwrap()
}

fn reserve(vehicle: &Vehicle, date: &str) -> CreateReservationRequest {
    CreateReservationRequest {
        vehicle_id: vehicle.id.clone(),
        date: date.to_string(),
    }
}

fn approve_with(slot: &ParkingSlot) -> ApproveReservationRequest {
    ApproveReservationRequest {
        parking_slot_id: slot.id.clone(),
    }
}

fn id_of(raw: &str) -> Id {
    Id::parse(raw, "reservation").unwrap()
}

fn assert_bad_request(err: AppError, expected: &str) {
    match err {
        AppError::BadRequest(message) => assert_eq!(message, expected),
        other => panic!("expected BadRequest({expected:?}), got {other:?}"),
    }
}

// =====================================
// Reservation Lifecycle
// =====================================
#[tokio::test]
async fn test_approve_assigns_slot_and_notifies_owner() {
    let (state, mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let car = vehicle(&state, &alice, "12ABC345").await;
    let s1 = slot(&state, "S1").await;

    let pending = state
        .reservation_service
        .create(&alice, reserve(&car, "2024-06-01"))
        .await
        .unwrap();
    assert_eq!(pending.status, ReservationStatus::Pending);
    assert!(pending.parking_slot.is_none());
    assert_eq!(pending.vehicle.plate, "12ABC345");

    let approved = state
        .reservation_service
        .approve(&admin, &id_of(&pending.id), approve_with(&s1))
        .await
        .unwrap();

    assert_eq!(approved.status, ReservationStatus::Approved);
    assert_eq!(approved.parking_slot.as_ref().map(|s| s.slot_code.as_str()), Some("S1"));
    assert_eq!(approved.approved_by.as_deref(), Some(admin.id.as_str()));
    assert!(approved.approved_at.is_some());

    let email = mailer.last_to("alice@example.com").unwrap();
    assert_eq!(email.subject, "Parking Reservation Approved");
    assert!(email.body.contains("2024-06-01"));
    assert!(email.body.contains("S1"));
}

#[tokio::test]
async fn test_slot_cannot_be_approved_twice_for_same_date() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let bob = register(&state, "bob@example.com").await;
    let alice_car = vehicle(&state, &alice, "11AAA111").await;
    let bob_car = vehicle(&state, &bob, "22BBB222").await;
    let s1 = slot(&state, "S1").await;

    let first = state
        .reservation_service
        .create(&alice, reserve(&alice_car, "2024-06-01"))
        .await
        .unwrap();
    let second = state
        .reservation_service
        .create(&bob, reserve(&bob_car, "2024-06-01"))
        .await
        .unwrap();

    state
        .reservation_service
        .approve(&admin, &id_of(&first.id), approve_with(&s1))
        .await
        .unwrap();

    let err = state
        .reservation_service
        .approve(&admin, &id_of(&second.id), approve_with(&s1))
        .await
        .unwrap_err();
    assert_bad_request(err, SLOT_TAKEN_MESSAGE);

    // رزرو دوم هنوز در انتظاره و میشه با یه جای دیگه تاییدش کرد
    let s2 = slot(&state, "S2").await;
    let approved = state
        .reservation_service
        .approve(&admin, &id_of(&second.id), approve_with(&s2))
        .await
        .unwrap();
    assert_eq!(approved.status, ReservationStatus::Approved);
}

#[tokio::test]
async fn test_same_slot_on_different_dates_is_fine() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let car = vehicle(&state, &alice, "11AAA111").await;
    let s1 = slot(&state, "S1").await;

    for date in ["2024-06-01", "2024-06-02"] {
        let reservation = state
            .reservation_service
            .create(&alice, reserve(&car, date))
            .await
            .unwrap();
        state
            .reservation_service
            .approve(&admin, &id_of(&reservation.id), approve_with(&s1))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_terminal_reservations_cannot_change() {
    let (state, mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let car = vehicle(&state, &alice, "11AAA111").await;
    let s1 = slot(&state, "S1").await;

    let reservation = state
        .reservation_service
        .create(&alice, reserve(&car, "2024-06-01"))
        .await
        .unwrap();
    let id = id_of(&reservation.id);

    let rejected = state.reservation_service.reject(&admin, &id).await.unwrap();
    assert_eq!(rejected.status, ReservationStatus::Rejected);
    assert!(rejected.parking_slot.is_none());
    assert!(rejected.approved_by.is_none());

    let err = state.reservation_service.reject(&admin, &id).await.unwrap_err();
    assert_bad_request(err, NOT_PENDING_MESSAGE);

    let err = state
        .reservation_service
        .approve(&admin, &id, approve_with(&s1))
        .await
        .unwrap_err();
    assert_bad_request(err, NOT_PENDING_MESSAGE);

    // فقط یک ایمیل رد
    let rejections = mailer
        .sent()
        .into_iter()
        .filter(|e| e.subject == "Parking Reservation Rejected")
        .count();
    assert_eq!(rejections, 1);
}

#[tokio::test]
async fn test_unknown_reservation_or_slot_is_not_found() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let car = vehicle(&state, &alice, "11AAA111").await;
    let s1 = slot(&state, "S1").await;

    let err = state
        .reservation_service
        .approve(&admin, &Id::new(), approve_with(&s1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let reservation = state
        .reservation_service
        .create(&alice, reserve(&car, "2024-06-01"))
        .await
        .unwrap();
    let err = state
        .reservation_service
        .approve(
            &admin,
            &id_of(&reservation.id),
            ApproveReservationRequest {
                parking_slot_id: Id::new().into_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// =====================================
// Create Rules
// =====================================
#[tokio::test]
async fn test_one_active_reservation_per_user_per_date() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let car = vehicle(&state, &alice, "11AAA111").await;
    let second_car = vehicle(&state, &alice, "33CCC333").await;

    let first = state
        .reservation_service
        .create(&alice, reserve(&car, "2024-06-01"))
        .await
        .unwrap();

    // حتی با یه خودروی دیگه
    let err = state
        .reservation_service
        .create(&alice, reserve(&second_car, "2024-06-01"))
        .await
        .unwrap_err();
    assert_bad_request(err, DUPLICATE_RESERVATION_MESSAGE);

    // بعد از رد شدن، روز دوباره آزاد میشه
    state
        .reservation_service
        .reject(&admin, &id_of(&first.id))
        .await
        .unwrap();
    let again = state
        .reservation_service
        .create(&alice, reserve(&second_car, "2024-06-01"))
        .await
        .unwrap();
    assert_eq!(again.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn test_vehicle_must_belong_to_caller() {
    let (state, _mailer) = setup().await;
    let alice = register(&state, "alice@example.com").await;
    let bob = register(&state, "bob@example.com").await;
    let bob_car = vehicle(&state, &bob, "22BBB222").await;

    let err = state
        .reservation_service
        .create(&alice, reserve(&bob_car, "2024-06-01"))
        .await
        .unwrap_err();
    assert_bad_request(err, VEHICLE_NOT_YOURS_MESSAGE);

    let err = state
        .reservation_service
        .create(
            &alice,
            CreateReservationRequest {
                vehicle_id: "not-a-uuid".to_string(),
                date: "2024-06-01".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_bad_request(err, VEHICLE_NOT_YOURS_MESSAGE);
}

#[tokio::test]
async fn test_invalid_date_is_rejected_before_anything_else() {
    let (state, _mailer) = setup().await;
    let alice = register(&state, "alice@example.com").await;

    let err = state
        .reservation_service
        .create(
            &alice,
            CreateReservationRequest {
                vehicle_id: Id::new().into_string(),
                date: "2024-02-30".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_bad_request(err, parking_backend::utils::INVALID_DATE_MESSAGE);
}

// =====================================
// Visibility
// =====================================
#[tokio::test]
async fn test_reservation_visibility() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let bob = register(&state, "bob@example.com").await;
    let car = vehicle(&state, &alice, "11AAA111").await;

    let reservation = state
        .reservation_service
        .create(&alice, reserve(&car, "2024-06-01"))
        .await
        .unwrap();
    let id = id_of(&reservation.id);

    assert!(state.reservation_service.get(&alice, &id).await.is_ok());
    assert!(state.reservation_service.get(&admin, &id).await.is_ok());
    assert!(matches!(
        state.reservation_service.get(&bob, &id).await,
        Err(AppError::Forbidden(_))
    ));

    assert_eq!(state.reservation_service.list_mine(&alice).await.unwrap().len(), 1);
    assert!(state.reservation_service.list_mine(&bob).await.unwrap().is_empty());

    let pending = state.reservation_service.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].user.email, "alice@example.com");
}

#[tokio::test]
async fn test_pending_list_is_ordered_by_date() {
    let (state, _mailer) = setup().await;
    let alice = register(&state, "alice@example.com").await;
    let bob = register(&state, "bob@example.com").await;
    let alice_car = vehicle(&state, &alice, "11AAA111").await;
    let bob_car = vehicle(&state, &bob, "22BBB222").await;

    state
        .reservation_service
        .create(&alice, reserve(&alice_car, "2024-06-03"))
        .await
        .unwrap();
    state
        .reservation_service
        .create(&bob, reserve(&bob_car, "2024-06-01"))
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = state
        .reservation_service
        .list_pending()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.date)
        .collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        ]
    );
}

// =====================================
// Availability
// =====================================
#[tokio::test]
async fn test_available_slots_exclude_approved_only() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let bob = register(&state, "bob@example.com").await;
    let alice_car = vehicle(&state, &alice, "11AAA111").await;
    let bob_car = vehicle(&state, &bob, "22BBB222").await;
    let s1 = slot(&state, "S1").await;
    slot(&state, "S2").await;
    slot(&state, "S3").await;

    let approved = state
        .reservation_service
        .create(&alice, reserve(&alice_car, "2024-06-01"))
        .await
        .unwrap();
    state
        .reservation_service
        .approve(&admin, &id_of(&approved.id), approve_with(&s1))
        .await
        .unwrap();

    // رزرو در انتظار جایی رو اشغال نمیکنه
    state
        .reservation_service
        .create(&bob, reserve(&bob_car, "2024-06-01"))
        .await
        .unwrap();

    let codes = |slots: Vec<ParkingSlot>| slots.into_iter().map(|s| s.slot_code).collect::<Vec<_>>();

    let available = state
        .parking_slot_service
        .list_available(Some("2024-06-01"))
        .await
        .unwrap();
    assert_eq!(codes(available), vec!["S2", "S3"]);

    let next_day = state
        .parking_slot_service
        .list_available(Some("2024-06-02"))
        .await
        .unwrap();
    assert_eq!(codes(next_day), vec!["S1", "S2", "S3"]);

    assert!(matches!(
        state.parking_slot_service.list_available(None).await,
        Err(AppError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_slot_in_use_cannot_be_deleted() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let car = vehicle(&state, &alice, "11AAA111").await;
    let s1 = slot(&state, "S1").await;
    let s2 = slot(&state, "S2").await;

    let reservation = state
        .reservation_service
        .create(&alice, reserve(&car, "2024-06-01"))
        .await
        .unwrap();
    state
        .reservation_service
        .approve(&admin, &id_of(&reservation.id), approve_with(&s1))
        .await
        .unwrap();

    let s1_id = Id::parse(&s1.id, "parking slot").unwrap();
    assert!(matches!(
        state.parking_slot_service.delete(&s1_id).await,
        Err(AppError::BadRequest(_))
    ));

    let s2_id = Id::parse(&s2.id, "parking slot").unwrap();
    state.parking_slot_service.delete(&s2_id).await.unwrap();
    assert!(matches!(
        state.parking_slot_service.get(&s2_id).await,
        Err(AppError::NotFound(_))
    ));

    // خودرویی که رزرو داره هم حذف نمیشه
    let car_id = Id::parse(&car.id, "vehicle").unwrap();
    assert!(matches!(
        state.vehicle_service.delete_mine(&alice, &car_id).await,
        Err(AppError::BadRequest(_))
    ));
}

// =====================================
// Store Guards
// =====================================
#[tokio::test]
async fn test_store_rejects_second_approved_row_for_slot_and_date() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let bob = register(&state, "bob@example.com").await;
    let alice_car = vehicle(&state, &alice, "11AAA111").await;
    let bob_car = vehicle(&state, &bob, "22BBB222").await;
    let s1 = slot(&state, "S1").await;

    let reservation = state
        .reservation_service
        .create(&alice, reserve(&alice_car, "2024-06-01"))
        .await
        .unwrap();
    state
        .reservation_service
        .approve(&admin, &id_of(&reservation.id), approve_with(&s1))
        .await
        .unwrap();

    // دور زدن سرویس: index یکتای جزئی باید جلوش رو بگیره
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO reservations \
         (id, user_id, vehicle_id, parking_slot_id, date, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, 'APPROVED', ?, ?)",
    )
    .bind(Id::new().as_str())
    .bind(bob.id.as_str())
    .bind(&bob_car.id)
    .bind(&s1.id)
    .bind(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    .bind(now)
    .bind(now)
    .execute(state.db.pool())
    .await;

    let err = result.unwrap_err();
    assert!(parking_backend::error::is_unique_violation(&err));
}

// =====================================
// Notifications
// =====================================
#[tokio::test]
async fn test_mail_failure_does_not_change_outcome() {
    let state = setup_with(Arc::new(FailingMailer)).await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let car = vehicle(&state, &alice, "11AAA111").await;
    let s1 = slot(&state, "S1").await;

    let reservation = state
        .reservation_service
        .create(&alice, reserve(&car, "2024-06-01"))
        .await
        .unwrap();
    let approved = state
        .reservation_service
        .approve(&admin, &id_of(&reservation.id), approve_with(&s1))
        .await
        .unwrap();
    assert_eq!(approved.status, ReservationStatus::Approved);

    // forgot-password هم با mailer خراب موفق برمیگرده
    state
        .auth_service
        .forgot_password(ForgotPasswordRequest {
            email: "alice@example.com".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_stalled_mail_server_does_not_block_decisions() {
    let notifier = Notifier::new(Arc::new(StalledMailer)).with_send_timeout(Duration::from_millis(100));
    let state = setup_with_notifier(notifier).await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let car = vehicle(&state, &alice, "11AAA111").await;
    let s1 = slot(&state, "S1").await;

    let first = state
        .reservation_service
        .create(&alice, reserve(&car, "2024-06-01"))
        .await
        .unwrap();
    let second = state
        .reservation_service
        .create(&alice, reserve(&car, "2024-06-02"))
        .await
        .unwrap();

    let approve = tokio::time::timeout(
        Duration::from_secs(5),
        state
            .reservation_service
            .approve(&admin, &id_of(&first.id), approve_with(&s1)),
    )
    .await
    .expect("approve should not wait for the mail server")
    .unwrap();
    assert_eq!(approve.status, ReservationStatus::Approved);

    let reject = tokio::time::timeout(
        Duration::from_secs(5),
        state.reservation_service.reject(&admin, &id_of(&second.id)),
    )
    .await
    .expect("reject should not wait for the mail server")
    .unwrap();
    assert_eq!(reject.status, ReservationStatus::Rejected);
}

// =====================================
// Password Reset
// =====================================
fn otp_from(email: &Email) -> String {
    email
        .body
        .split_whitespace()
        .map(|word| word.trim_end_matches('.'))
        .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_password_reset_otp_is_single_use() {
    let (state, mailer) = setup().await;
    register(&state, "alice@example.com").await;

    state
        .auth_service
        .forgot_password(ForgotPasswordRequest {
            email: "alice@example.com".to_string(),
        })
        .await
        .unwrap();

    let otp = otp_from(&mailer.last_to("alice@example.com").unwrap());
    let reset = |otp: &str, password: &str| ResetPasswordRequest {
        email: "alice@example.com".to_string(),
        otp: otp.to_string(),
        new_password: password.to_string(),
    };

    state
        .auth_service
        .reset_password(reset(&otp, "newsecret1"))
        .await
        .unwrap();

    let login = state
        .auth_service
        .login(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "newsecret1".to_string(),
        })
        .await;
    assert!(login.is_ok());

    let err = state
        .auth_service
        .reset_password(reset(&otp, "another99"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_expired_reset_code_cannot_be_consumed() {
    let (state, _mailer) = setup().await;
    let alice = register(&state, "alice@example.com").await;
    let users = UserRepository::new(state.db.clone());
    let token_hash = hash_secret("123456").unwrap();

    users
        .set_reset_token(
            alice.id.as_str(),
            &token_hash,
            Utc::now() - chrono::Duration::minutes(1),
        )
        .await
        .unwrap();

    let consumed = users
        .consume_reset_token(alice.id.as_str(), &token_hash, &hash_secret("newsecret1").unwrap())
        .await
        .unwrap();
    assert!(!consumed);

    users
        .set_reset_token(
            alice.id.as_str(),
            &token_hash,
            Utc::now() + chrono::Duration::minutes(10),
        )
        .await
        .unwrap();

    let consumed = users
        .consume_reset_token(alice.id.as_str(), &token_hash, &hash_secret("newsecret1").unwrap())
        .await
        .unwrap();
    assert!(consumed);
}

#[tokio::test]
async fn test_forgot_password_for_unknown_email_sends_nothing() {
    let (state, mailer) = setup().await;

    state
        .auth_service
        .forgot_password(ForgotPasswordRequest {
            email: "ghost@example.com".to_string(),
        })
        .await
        .unwrap();

    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_ensure_admin_is_idempotent() {
    let (state, _mailer) = setup().await;
    let first = admin(&state).await;
    let second = admin(&state).await;

    assert_eq!(first.id, second.id);
    assert!(second.is_admin());
}

// =====================================
// Deletion
// =====================================
#[tokio::test]
async fn test_deleting_user_cascades_to_vehicles_and_reservations() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;
    let bob = register(&state, "bob@example.com").await;
    let alice_car = vehicle(&state, &alice, "11AAA111").await;
    vehicle(&state, &bob, "22BBB222").await;

    state
        .reservation_service
        .create(&alice, reserve(&alice_car, "2024-06-01"))
        .await
        .unwrap();

    let vehicles = VehicleRepository::new(state.db.clone());
    assert_eq!(vehicles.count().await.unwrap(), 2);

    state.user_service.delete_user(&admin, &alice.id).await.unwrap();

    let remaining = vehicles.find_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, bob.id.as_str());

    let reservations = ReservationRepository::new(state.db.clone());
    assert!(reservations.find_by_user(alice.id.as_str()).await.unwrap().is_empty());
    assert!(state.reservation_service.list_pending().await.unwrap().is_empty());

    assert!(matches!(
        state.user_service.delete_user(&admin, &alice.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_vehicle_for_deleted_owner_is_unauthorized() {
    let (state, _mailer) = setup().await;
    let admin = admin(&state).await;
    let alice = register(&state, "alice@example.com").await;

    state.user_service.delete_user(&admin, &alice.id).await.unwrap();

    let err = state
        .vehicle_service
        .create(
            &alice,
            CreateVehicleRequest {
                plate: "11AAA111".to_string(),
                model: "Toyota Corolla".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}
