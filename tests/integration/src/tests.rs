//! Integration tests for the Lucky Draw raffle and its drand coordinator.
//!
//! Both contracts run against their own `cosmwasm_std::testing` mocks. The
//! messages each one emits are forwarded to the other by hand, with the
//! sender set the way the chain would set it.
//!
//! Run:
//! ```bash
//! cargo test -p lucky-draw-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, Addr, BankMsg, Binary, CosmosMsg, Env, MemoryStorage, OwnedDeps, Response,
    Timestamp, Uint128, Uint256, WasmMsg,
};
use lucky_draw_common::msg::ConsumerExecuteMsg;
use lucky_draw_common::types::RaffleState;
use lucky_draw_drand_coordinator::beacon::derive_random_words;

use lucky_draw_drand_coordinator as coordinator;
use lucky_draw_raffle as raffle;

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

/// Real drand quicknet public key
const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

/// Publish time of round 999. Requests made in the next three seconds target round 1000.
const ROUND_1000_WINDOW: u64 = 1_692_806_361;
/// Chain height when the first draw is requested
const REQUEST_HEIGHT: u64 = 20_000;

const FEE: u128 = 100;
const INTERVAL: u64 = 3600;
const REQUEST_TIMEOUT: u64 = 1;
const DENOM: &str = "inj";

// ─── Helpers ───

fn addr(name: &str) -> Addr {
    MockApi::default().addr_make(name)
}

/// Address the raffle runs at; the coordinator sees it as the requester.
fn raffle_addr() -> Addr {
    mock_env().contract.address
}

/// Block at `seconds` past the start of the round 1000 window, `blocks` past the
/// first request height.
fn env_at(seconds: i64, blocks: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(ROUND_1000_WINDOW.saturating_add_signed(seconds));
    env.block.height = REQUEST_HEIGHT + blocks;
    env
}

/// Raffle whose first draw becomes due exactly at the start of the window.
fn setup_raffle(interval_seconds: u64) -> Deps {
    let mut deps = mock_dependencies();
    let msg = raffle::msg::InstantiateMsg {
        entrance_fee: Uint128::new(FEE),
        denom: DENOM.to_string(),
        interval_seconds,
        coordinator: addr("coordinator").to_string(),
        min_confirmations: 3,
        callback_gas_limit: 500_000,
        num_words: 1,
        request_timeout_seconds: REQUEST_TIMEOUT,
    };
    let mut env = env_at(-(interval_seconds as i64), 0);
    env.block.height = 1;
    raffle::contract::instantiate(deps.as_mut(), env, message_info(&addr("admin"), &[]), msg)
        .unwrap();
    deps
}

fn setup_coordinator() -> Deps {
    let mut deps = mock_dependencies();
    let msg = coordinator::msg::InstantiateMsg {
        operators: vec![addr("operator").to_string()],
        quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
        chain_hash: "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971".to_string(),
        genesis_time: 1692803367,
        period_seconds: 3,
        min_request_confirmations: 1,
        max_callback_gas_limit: 2_000_000,
        max_num_words: 10,
    };
    coordinator::contract::instantiate(
        deps.as_mut(),
        mock_env(),
        message_info(&addr("admin"), &[]),
        msg,
    )
    .unwrap();

    let submit = coordinator::msg::ExecuteMsg::SubmitBeacon {
        round: TEST_ROUND,
        signature_hex: TEST_SIG_HEX.to_string(),
    };
    coordinator::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&addr("operator"), &[]),
        submit,
    )
    .unwrap();
    deps
}

fn enter(deps: &mut Deps, player: &Addr) {
    let info = message_info(player, &coins(FEE, DENOM));
    raffle::contract::execute(
        deps.as_mut(),
        mock_env(),
        info,
        raffle::msg::ExecuteMsg::Enter {},
    )
    .unwrap();
}

fn check_upkeep(deps: &Deps, env: Env) -> bool {
    let res = raffle::contract::query(
        deps.as_ref(),
        env,
        raffle::msg::QueryMsg::CheckUpkeep {
            check_data: Binary::default(),
        },
    )
    .unwrap();
    let check: raffle::msg::CheckUpkeepResponse = from_json(res).unwrap();
    check.upkeep_needed
}

/// Pull the single wasm execute out of a response.
fn wasm_call(res: &Response) -> (String, Binary) {
    assert_eq!(res.messages.len(), 1);
    match &res.messages[0].msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr, msg, ..
        }) => (contract_addr.clone(), msg.clone()),
        other => panic!("expected a wasm execute, got {:?}", other),
    }
}

/// Run upkeep on the raffle and deliver its request to the coordinator in
/// the same block. Returns the request id.
fn request_draw(raffle_deps: &mut Deps, coordinator_deps: &mut Deps, env: Env) -> u64 {
    let res = raffle::contract::execute(
        raffle_deps.as_mut(),
        env.clone(),
        message_info(&addr("keeper"), &[]),
        raffle::msg::ExecuteMsg::PerformUpkeep {
            perform_data: Binary::default(),
        },
    )
    .unwrap();
    let request_id: u64 = from_json(res.data.clone().unwrap()).unwrap();

    let (target, msg) = wasm_call(&res);
    assert_eq!(target, addr("coordinator").to_string());
    let raw: serde_json::Value = serde_json::from_slice(&msg).unwrap();
    assert_eq!(raw["request_randomness"]["request_id"], request_id);
    let msg: coordinator::msg::ExecuteMsg = from_json(&msg).unwrap();

    coordinator::contract::execute(
        coordinator_deps.as_mut(),
        env,
        message_info(&raffle_addr(), &[]),
        msg,
    )
    .unwrap();
    request_id
}

fn fulfill_on_coordinator(
    coordinator_deps: &mut Deps,
    env: Env,
    request_id: u64,
) -> Result<Response, coordinator::ContractError> {
    coordinator::contract::execute(
        coordinator_deps.as_mut(),
        env,
        message_info(&addr("operator"), &[]),
        coordinator::msg::ExecuteMsg::FulfillRequest {
            requester: raffle_addr().to_string(),
            request_id,
        },
    )
}

/// Deliver the coordinator's callback to the raffle.
fn deliver_callback(
    raffle_deps: &mut Deps,
    env: Env,
    callback: &Response,
) -> Result<Response, raffle::ContractError> {
    let (target, msg) = wasm_call(callback);
    assert_eq!(target, raffle_addr().to_string());
    let msg: raffle::msg::ExecuteMsg = from_json(&msg).unwrap();
    raffle::contract::execute(
        raffle_deps.as_mut(),
        env,
        message_info(&addr("coordinator"), &[]),
        msg,
    )
}

fn raffle_state(deps: &Deps) -> RaffleState {
    let res = raffle::contract::query(
        deps.as_ref(),
        mock_env(),
        raffle::msg::QueryMsg::RaffleState {},
    )
    .unwrap();
    from_json(res).unwrap()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_draw_through_coordinator() {
    let mut raffle_deps = setup_raffle(INTERVAL);
    let mut coordinator_deps = setup_coordinator();

    let players = [addr("alice"), addr("bob"), addr("carol")];
    for player in &players {
        enter(&mut raffle_deps, player);
    }

    // 1. Not due before the interval elapses
    assert!(!check_upkeep(&raffle_deps, env_at(-1, 0)));
    assert!(check_upkeep(&raffle_deps, env_at(0, 0)));

    // 2. Request randomness; the coordinator pins the next unpublished round
    let request_id = request_draw(&mut raffle_deps, &mut coordinator_deps, env_at(0, 0));
    assert_eq!(request_id, 1);
    assert_eq!(raffle_state(&raffle_deps), RaffleState::Calculating);
    assert!(!check_upkeep(&raffle_deps, env_at(INTERVAL as i64, 720)));

    let res = coordinator::contract::query(
        coordinator_deps.as_ref(),
        mock_env(),
        coordinator::msg::QueryMsg::Request {
            requester: raffle_addr().to_string(),
            request_id,
        },
    )
    .unwrap();
    let request: Option<coordinator::state::RandomnessRequest> = from_json(res).unwrap();
    assert_eq!(request.unwrap().target_round, TEST_ROUND);

    // 3. Coordinator answers from beacon 1000
    let fulfill_env = env_at(30, 6);
    let callback =
        fulfill_on_coordinator(&mut coordinator_deps, fulfill_env.clone(), request_id).unwrap();

    let randomness = hex::decode(TEST_RANDOMNESS_HEX).unwrap();
    let words = derive_random_words(&randomness, &raffle_addr(), request_id, 1);
    let (_, msg) = wasm_call(&callback);
    let delivered: ConsumerExecuteMsg = from_json(&msg).unwrap();
    assert_eq!(
        delivered,
        ConsumerExecuteMsg::ReceiveRandomness {
            request_id,
            random_words: words.clone(),
        }
    );

    // 4. Raffle picks the winner and pays the pool
    let res = deliver_callback(&mut raffle_deps, fulfill_env.clone(), &callback).unwrap();

    let rem = words[0] % Uint256::from(3u64);
    let winner_index = (0..3u64).position(|i| Uint256::from(i) == rem).unwrap();
    let winner = players[winner_index].clone();

    assert_eq!(res.messages.len(), 1);
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Bank(BankMsg::Send {
            to_address: winner.to_string(),
            amount: coins(3 * FEE, DENOM),
        })
    );

    let res = raffle::contract::query(
        raffle_deps.as_ref(),
        mock_env(),
        raffle::msg::QueryMsg::RecentWinner {},
    )
    .unwrap();
    let recent: Option<Addr> = from_json(res).unwrap();
    assert_eq!(recent, Some(winner));

    let res = raffle::contract::query(
        raffle_deps.as_ref(),
        mock_env(),
        raffle::msg::QueryMsg::NumPlayers {},
    )
    .unwrap();
    let num_players: u32 = from_json(res).unwrap();
    assert_eq!(num_players, 0);

    let res = raffle::contract::query(
        raffle_deps.as_ref(),
        mock_env(),
        raffle::msg::QueryMsg::PoolBalance {},
    )
    .unwrap();
    let pool: serde_json::Value = serde_json::from_slice(&res).unwrap();
    assert_eq!(pool, serde_json::json!({ "round": 2, "balance": "0", "denom": DENOM }));

    let res = raffle::contract::query(
        raffle_deps.as_ref(),
        mock_env(),
        raffle::msg::QueryMsg::LastTimestamp {},
    )
    .unwrap();
    let last: Timestamp = from_json(res).unwrap();
    assert_eq!(last, fulfill_env.block.time);
    assert_eq!(raffle_state(&raffle_deps), RaffleState::Open);

    // 5. Coordinator kept a record of the answer
    let res = coordinator::contract::query(
        coordinator_deps.as_ref(),
        mock_env(),
        coordinator::msg::QueryMsg::Fulfillment {
            requester: raffle_addr().to_string(),
            request_id,
        },
    )
    .unwrap();
    let fulfillment: Option<coordinator::state::Fulfillment> = from_json(res).unwrap();
    let fulfillment = fulfillment.unwrap();
    assert!(fulfillment.callback_success);
    assert_eq!(fulfillment.drand_round, TEST_ROUND);
    assert_eq!(fulfillment.random_words, words);
}

#[test]
fn test_replayed_callback_is_refused() {
    let mut raffle_deps = setup_raffle(INTERVAL);
    let mut coordinator_deps = setup_coordinator();

    enter(&mut raffle_deps, &addr("alice"));
    enter(&mut raffle_deps, &addr("bob"));

    let request_id = request_draw(&mut raffle_deps, &mut coordinator_deps, env_at(0, 0));
    let callback =
        fulfill_on_coordinator(&mut coordinator_deps, env_at(30, 6), request_id).unwrap();
    deliver_callback(&mut raffle_deps, env_at(30, 6), &callback).unwrap();

    // Same callback again: the handle is spent
    let err = deliver_callback(&mut raffle_deps, env_at(60, 12), &callback).unwrap_err();
    assert!(matches!(err, raffle::ContractError::UnknownRequest { request_id: 1 }));

    // The coordinator will not answer it twice either
    let err =
        fulfill_on_coordinator(&mut coordinator_deps, env_at(60, 12), request_id).unwrap_err();
    assert!(matches!(
        err,
        coordinator::ContractError::RequestNotFound { request_id: 1, .. }
    ));
}

#[test]
fn test_second_round_uses_fresh_request() {
    // One-second interval keeps both draws inside the round 1000 window
    let mut raffle_deps = setup_raffle(1);
    let mut coordinator_deps = setup_coordinator();

    enter(&mut raffle_deps, &addr("alice"));
    let first = request_draw(&mut raffle_deps, &mut coordinator_deps, env_at(0, 0));
    let callback = fulfill_on_coordinator(&mut coordinator_deps, env_at(0, 6), first).unwrap();
    let res = deliver_callback(&mut raffle_deps, env_at(0, 6), &callback).unwrap();

    // Sole entrant always wins
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Bank(BankMsg::Send {
            to_address: addr("alice").to_string(),
            amount: coins(FEE, DENOM),
        })
    );

    enter(&mut raffle_deps, &addr("bob"));
    enter(&mut raffle_deps, &addr("carol"));
    assert!(!check_upkeep(&raffle_deps, env_at(0, 7)));

    let second = request_draw(&mut raffle_deps, &mut coordinator_deps, env_at(1, 8));
    assert_eq!(second, 2);

    let callback = fulfill_on_coordinator(&mut coordinator_deps, env_at(1, 14), second).unwrap();
    deliver_callback(&mut raffle_deps, env_at(1, 14), &callback).unwrap();

    let res = raffle::contract::query(
        raffle_deps.as_ref(),
        mock_env(),
        raffle::msg::QueryMsg::RoundHistory {
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let history: raffle::msg::RoundHistoryResponse = from_json(res).unwrap();
    assert_eq!(history.rounds.len(), 2);
    assert_eq!(history.rounds[0].winner, addr("alice"));
    assert_eq!(history.rounds[1].num_players, 2);
    assert!([addr("bob"), addr("carol")].contains(&history.rounds[1].winner));
}

#[test]
fn test_lost_callback_recovered_by_abandon() {
    let mut raffle_deps = setup_raffle(1);
    let mut coordinator_deps = setup_coordinator();

    enter(&mut raffle_deps, &addr("alice"));
    enter(&mut raffle_deps, &addr("bob"));

    let first = request_draw(&mut raffle_deps, &mut coordinator_deps, env_at(0, 0));
    fulfill_on_coordinator(&mut coordinator_deps, env_at(0, 6), first).unwrap();

    // The callback reverted on the raffle side; the coordinator only notes it
    let reply = cosmwasm_std::Reply {
        id: coordinator::contract::CALLBACK_REPLY_ID,
        payload: cosmwasm_std::to_json_binary(&coordinator::execute::CallbackReplyPayload {
            requester: raffle_addr(),
            request_id: first,
        })
        .unwrap(),
        gas_used: 0,
        result: cosmwasm_std::SubMsgResult::Err("payout failed".to_string()),
    };
    coordinator::contract::reply(coordinator_deps.as_mut(), env_at(0, 6), reply).unwrap();
    assert_eq!(raffle_state(&raffle_deps), RaffleState::Calculating);

    // Too early to abandon
    let err = raffle::contract::execute(
        raffle_deps.as_mut(),
        env_at(0, 7),
        message_info(&addr("admin"), &[]),
        raffle::msg::ExecuteMsg::AbandonRequest {},
    )
    .unwrap_err();
    assert!(matches!(
        err,
        raffle::ContractError::RequestNotTimedOut { request_id: 1, .. }
    ));

    // Admin drops the stuck request once it timed out; entries are kept
    raffle::contract::execute(
        raffle_deps.as_mut(),
        env_at(REQUEST_TIMEOUT as i64, 8),
        message_info(&addr("admin"), &[]),
        raffle::msg::ExecuteMsg::AbandonRequest {},
    )
    .unwrap();
    assert_eq!(raffle_state(&raffle_deps), RaffleState::Open);

    let second = request_draw(&mut raffle_deps, &mut coordinator_deps, env_at(1, 9));
    assert_eq!(second, 2);
    let callback = fulfill_on_coordinator(&mut coordinator_deps, env_at(1, 15), second).unwrap();
    let res = deliver_callback(&mut raffle_deps, env_at(1, 15), &callback).unwrap();

    match &res.messages[0].msg {
        CosmosMsg::Bank(BankMsg::Send { amount, .. }) => {
            assert_eq!(amount, &coins(2 * FEE, DENOM));
        }
        other => panic!("expected payout, got {:?}", other),
    }
}
