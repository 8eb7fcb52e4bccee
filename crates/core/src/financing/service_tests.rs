use super::*;
use crate::member::{MemberStatus, SavingsBalances};
use koperasi_shared::types::MemberId;
use proptest::prelude::*;
use rust_decimal_macros::dec;

fn member(total_savings: Decimal) -> Member {
    Member {
        id: MemberId::new(),
        name: "Rahmat".to_string(),
        member_number: "A-0100".to_string(),
        unit: "Gudang".to_string(),
        join_date: NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
        status: MemberStatus::Active,
        savings: SavingsBalances {
            pokok: Decimal::ZERO,
            wajib: total_savings,
            sukarela: Decimal::ZERO,
        },
    }
}

fn input(member: &Member, cost: Decimal, tenor: u32, dp: Decimal) -> CreateContractInput {
    CreateContractInput {
        member_id: member.id,
        item: "Sepeda motor".to_string(),
        cost_price: cost,
        tenor,
        down_payment: dp,
        contract_date: None,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}

fn running(contract: Contract) -> Contract {
    Contract {
        status: ContractStatus::Berjalan,
        ..contract
    }
}

#[test]
fn test_create_prices_contract() {
    let m = member(dec!(5000000));
    let contract = ContractService::create(
        input(&m, dec!(10000000), 12, Decimal::ZERO),
        &m,
        &CooperativeSettings::default(),
        today(),
    )
    .unwrap();

    assert_eq!(contract.status, ContractStatus::Review);
    assert_eq!(contract.margin, dec!(1500000));
    assert_eq!(contract.sale_price, dec!(11500000));
    assert_eq!(contract.installment, dec!(958333.33));
    assert_eq!(contract.outstanding_principal, dec!(10000000));
    assert_eq!(contract.outstanding_margin, dec!(1500000));
    assert_eq!(contract.contract_date, today());
}

#[test]
fn test_ceiling_is_enforced() {
    let m = member(dec!(1000000));
    let result = ContractService::create(
        input(&m, dec!(3500000), 6, dec!(400000)),
        &m,
        &CooperativeSettings::default(),
        today(),
    );
    assert!(matches!(
        result,
        Err(FinancingError::CeilingExceeded { .. })
    ));

    let ok = ContractService::create(
        input(&m, dec!(3500000), 6, dec!(500000)),
        &m,
        &CooperativeSettings::default(),
        today(),
    );
    assert!(ok.is_ok());
}

#[test]
fn test_create_validation() {
    let m = member(dec!(100000000));
    let settings = CooperativeSettings::default();

    let err = ContractService::create(input(&m, Decimal::ZERO, 6, Decimal::ZERO), &m, &settings, today())
        .unwrap_err();
    assert!(matches!(err, FinancingError::InvalidPrincipal));

    let err = ContractService::create(input(&m, dec!(1000), 0, Decimal::ZERO), &m, &settings, today())
        .unwrap_err();
    assert!(matches!(err, FinancingError::InvalidTenor));

    let err = ContractService::create(input(&m, dec!(1000), 6, dec!(1100)), &m, &settings, today())
        .unwrap_err();
    assert!(matches!(err, FinancingError::InvalidDownPayment { .. }));

    let err = ContractService::create(input(&m, dec!(1000), 6, dec!(-1)), &m, &settings, today())
        .unwrap_err();
    assert!(matches!(err, FinancingError::InvalidDownPayment { .. }));
}

#[test]
fn test_down_payment_is_bounded_by_cost_price() {
    let m = member(dec!(100000000));
    let settings = CooperativeSettings::default();

    // Above cost but below the sale price of 1150.
    let err = ContractService::create(input(&m, dec!(1000), 6, dec!(1050)), &m, &settings, today())
        .unwrap_err();
    assert!(matches!(
        err,
        FinancingError::InvalidDownPayment { cost_price, .. } if cost_price == dec!(1000)
    ));

    let paid_up = running(
        ContractService::create(input(&m, dec!(1000), 6, dec!(1000)), &m, &settings, today())
            .unwrap(),
    );
    assert_eq!(paid_up.outstanding_principal, Decimal::ZERO);
    let split = ContractService::next_installment(&paid_up).unwrap();
    assert_eq!(split.principal, Decimal::ZERO);
    assert_eq!(split.margin, dec!(16.67));
}

#[test]
fn test_stored_overpaid_contract_never_yields_negative_split() {
    let m = member(dec!(100000000));
    let mut contract = running(
        ContractService::create(
            input(&m, dec!(1000), 6, Decimal::ZERO),
            &m,
            &CooperativeSettings::default(),
            today(),
        )
        .unwrap(),
    );
    contract.down_payment = dec!(1050);
    contract.outstanding_principal = Decimal::ZERO;

    let mut current = contract;
    while let Some((next, _, split)) =
        ContractService::collect_installment(&current, None, Utc::now())
    {
        assert!(split.principal >= Decimal::ZERO);
        assert!(split.margin >= Decimal::ZERO);
        assert!(next.outstanding_principal >= Decimal::ZERO);
        current = next;
    }
    assert_eq!(current.status, ContractStatus::Lunas);
}

#[test]
fn test_inactive_member_rejected() {
    let mut m = member(dec!(100000000));
    m.status = MemberStatus::Inactive;
    let result = ContractService::create(
        input(&m, dec!(1000), 6, Decimal::ZERO),
        &m,
        &CooperativeSettings::default(),
        today(),
    );
    assert!(matches!(result, Err(FinancingError::MemberInactive(_))));
}

#[test]
fn test_status_change_and_force() {
    let m = member(dec!(100000000));
    let contract = ContractService::create(
        input(&m, dec!(1000), 6, Decimal::ZERO),
        &m,
        &CooperativeSettings::default(),
        today(),
    )
    .unwrap();

    let skip = ChangeStatusInput {
        status: ContractStatus::Berjalan,
        force: false,
    };
    assert!(matches!(
        ContractService::change_status(&contract, &skip),
        Err(FinancingError::InvalidTransition { .. })
    ));

    let forced = ChangeStatusInput {
        status: ContractStatus::Berjalan,
        force: true,
    };
    let updated = ContractService::change_status(&contract, &forced).unwrap();
    assert_eq!(updated.status, ContractStatus::Berjalan);
}

#[test]
fn test_collect_until_paid_off() {
    let m = member(dec!(100000000));
    let contract = running(
        ContractService::create(
            input(&m, dec!(10000000), 12, Decimal::ZERO),
            &m,
            &CooperativeSettings::default(),
            today(),
        )
        .unwrap(),
    );

    let mut current = contract;
    let mut principal = Decimal::ZERO;
    let mut margin = Decimal::ZERO;
    for n in 1..=12 {
        let (next, payment, split) =
            ContractService::collect_installment(&current, Some("2024-05"), Utc::now()).unwrap();
        assert_eq!(payment.installment_number, n);
        assert_eq!(payment.source, EntrySource::MonthlyBatch);
        principal += split.principal;
        margin += split.margin;
        current = next;
    }

    assert_eq!(principal, dec!(10000000));
    assert_eq!(margin, dec!(1500000));
    assert_eq!(current.status, ContractStatus::Lunas);
    assert_eq!(current.outstanding_principal, Decimal::ZERO);
    assert_eq!(current.outstanding_margin, Decimal::ZERO);
    assert!(ContractService::collect_installment(&current, None, Utc::now()).is_none());
}

#[test]
fn test_first_installment_split() {
    let m = member(dec!(100000000));
    let contract = running(
        ContractService::create(
            input(&m, dec!(10000000), 12, Decimal::ZERO),
            &m,
            &CooperativeSettings::default(),
            today(),
        )
        .unwrap(),
    );
    let split = ContractService::next_installment(&contract).unwrap();
    assert_eq!(split.principal, dec!(833333.33));
    assert_eq!(split.margin, dec!(125000));
}

#[test]
fn test_non_running_contract_has_nothing_due() {
    let m = member(dec!(100000000));
    let contract = ContractService::create(
        input(&m, dec!(1000), 6, Decimal::ZERO),
        &m,
        &CooperativeSettings::default(),
        today(),
    )
    .unwrap();
    assert!(ContractService::next_installment(&contract).is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Collecting every installment repays exactly the financed principal
    /// and the margin, never overshooting, and ends in Lunas.
    #[test]
    fn prop_installments_repay_exactly(
        cost_cents in 100_000i64..10_000_000_000i64,
        dp_pct in 0i64..50,
        tenor in 1u32..61,
    ) {
        let cost = Decimal::new(cost_cents, 2);
        let dp = koperasi_shared::types::round_money(cost * Decimal::new(dp_pct, 2));
        let m = member(cost * Decimal::from(10));
        let contract = ContractService::create(
            input(&m, cost, tenor, dp),
            &m,
            &CooperativeSettings::default(),
            today(),
        ).unwrap();

        let mut current = running(contract.clone());
        let mut principal = Decimal::ZERO;
        let mut margin = Decimal::ZERO;
        while let Some((next, _, split)) = ContractService::collect_installment(&current, None, Utc::now()) {
            prop_assert!(next.outstanding_principal >= Decimal::ZERO);
            prop_assert!(next.outstanding_margin >= Decimal::ZERO);
            principal += split.principal;
            margin += split.margin;
            current = next;
        }

        prop_assert_eq!(current.paid_installments, tenor);
        prop_assert_eq!(current.status, ContractStatus::Lunas);
        prop_assert_eq!(principal, contract.financed_principal());
        prop_assert_eq!(margin, contract.margin);
    }
}
