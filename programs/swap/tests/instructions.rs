//! Instruction handlers run through the program entrypoint.
//!
//! `Runtime` serializes accounts into the loader's input layout, calls
//! `swap::entry`, and commits account changes only when the instruction
//! succeeds. Token program CPIs are executed in-process by the SPL token
//! processor, with PDA signatures checked against the signer seeds.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Once;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::entrypoint::{
    deserialize, ProgramResult, BPF_ALIGN_OF_U128, MAX_PERMITTED_DATA_INCREASE, NON_DUP_MARKER,
    SUCCESS,
};
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_lang::solana_program::program_stubs::{set_syscall_stubs, SyscallStubs};
use anchor_lang::{InstructionData, ToAccountMetas};
use anchor_spl::token::spl_token;
use swap::constants::*;
use swap::state::*;
use swap::types::OfferStatus;
use swap::SwapError;

const NOW: i64 = 1_700_000_000;
const DEADLINE: i64 = NOW + 3_600;
const OFFER_ID: u64 = 7;

const MAKER_LAMPORTS: u64 = 1_000_000_000;
const PROGRAM_ACCOUNT_RENT: u64 = 5_000_000;
const TOKEN_ACCOUNT_RENT: u64 = 2_039_280;

thread_local! {
    static UNIX_TIMESTAMP: Cell<i64> = Cell::new(0);
}

struct InProcessTokenProgram;

impl SyscallStubs for InProcessTokenProgram {
    fn sol_get_clock_sysvar(&self, var_addr: *mut u8) -> u64 {
        let clock = Clock {
            unix_timestamp: UNIX_TIMESTAMP.with(Cell::get),
            ..Clock::default()
        };
        unsafe { *(var_addr as *mut Clock) = clock };
        SUCCESS
    }

    fn sol_invoke_signed(
        &self,
        instruction: &Instruction,
        account_infos: &[AccountInfo],
        signers_seeds: &[&[&[u8]]],
    ) -> ProgramResult {
        assert_eq!(instruction.program_id, spl_token::ID, "unexpected CPI target");
        let pda_signers = signers_seeds
            .iter()
            .map(|seeds| Pubkey::create_program_address(seeds, &swap::ID))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| ProgramError::InvalidSeeds)?;

        let mut accounts = Vec::with_capacity(instruction.accounts.len());
        for meta in &instruction.accounts {
            let mut info = account_infos
                .iter()
                .find(|info| *info.key == meta.pubkey)
                .ok_or(ProgramError::NotEnoughAccountKeys)?
                .clone();
            if meta.is_signer && !info.is_signer {
                if !pda_signers.contains(&meta.pubkey) {
                    return Err(ProgramError::MissingRequiredSignature);
                }
                info.is_signer = true;
            }
            accounts.push(info);
        }

        spl_token::processor::Processor::process(&instruction.program_id, &accounts, &instruction.data)
    }
}

fn install_stubs() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let _previous = set_syscall_stubs(Box::new(InProcessTokenProgram));
    });
}

#[derive(Clone, Default)]
struct StoredAccount {
    lamports: u64,
    data: Vec<u8>,
    owner: Pubkey,
    executable: bool,
}

struct Runtime {
    accounts: HashMap<Pubkey, StoredAccount>,
}

impl Runtime {
    fn new() -> Self {
        install_stubs();
        let mut runtime = Runtime { accounts: HashMap::new() };
        for program in [spl_token::ID, swap::ID] {
            runtime.accounts.insert(
                program,
                StoredAccount { lamports: 1, data: vec![], owner: Pubkey::new_unique(), executable: true },
            );
        }
        runtime
    }

    fn put(&mut self, key: Pubkey, account: StoredAccount) {
        self.accounts.insert(key, account);
    }

    fn fund(&mut self, key: Pubkey, lamports: u64) {
        self.put(key, StoredAccount { lamports, ..StoredAccount::default() });
    }

    fn put_program_account<T: AccountSerialize>(&mut self, key: Pubkey, account: &T, space: usize) {
        let mut data = Vec::new();
        account.try_serialize(&mut data).unwrap();
        data.resize(space, 0);
        self.put(
            key,
            StoredAccount { lamports: PROGRAM_ACCOUNT_RENT, data, owner: swap::ID, executable: false },
        );
    }

    fn put_token_account(&mut self, key: Pubkey, mint: Pubkey, owner: Pubkey, amount: u64) {
        let state = spl_token::state::Account {
            mint,
            owner,
            amount,
            state: spl_token::state::AccountState::Initialized,
            ..Default::default()
        };
        let mut data = vec![0u8; spl_token::state::Account::LEN];
        spl_token::state::Account::pack(state, &mut data).unwrap();
        self.put(
            key,
            StoredAccount { lamports: TOKEN_ACCOUNT_RENT, data, owner: spl_token::ID, executable: false },
        );
    }

    fn lamports(&self, key: &Pubkey) -> u64 {
        self.accounts.get(key).map_or(0, |account| account.lamports)
    }

    fn token_balance(&self, key: &Pubkey) -> u64 {
        spl_token::state::Account::unpack(&self.accounts[key].data).unwrap().amount
    }

    fn load<T: AccountDeserialize>(&self, key: &Pubkey) -> T {
        T::try_deserialize(&mut &self.accounts[key].data[..]).unwrap()
    }

    fn process(&mut self, instruction: Instruction, now: i64) -> ProgramResult {
        UNIX_TIMESTAMP.with(|clock| clock.set(now));
        let mut input = self.serialize(&instruction);

        let (program_id, accounts, data) = unsafe { deserialize(input.as_mut_ptr() as *mut u8) };
        let result = swap::entry(program_id, &accounts, data);
        if result.is_ok() {
            for info in accounts.iter() {
                let account = StoredAccount {
                    lamports: info.lamports(),
                    data: info.data.borrow().to_vec(),
                    owner: *info.owner,
                    executable: info.executable,
                };
                self.accounts.insert(*info.key, account);
            }
        }
        result
    }

    /// Loader input layout: accounts (with realloc headroom), instruction
    /// data, program id. Backed by u64 words for alignment.
    fn serialize(&self, instruction: &Instruction) -> Vec<u64> {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&(instruction.accounts.len() as u64).to_le_bytes());

        let mut seen: Vec<Pubkey> = Vec::new();
        for meta in &instruction.accounts {
            if let Some(position) = seen.iter().position(|key| *key == meta.pubkey) {
                bytes.push(position as u8);
                bytes.extend_from_slice(&[0u8; 7]);
                seen.push(meta.pubkey);
                continue;
            }
            seen.push(meta.pubkey);

            let account = self.accounts.get(&meta.pubkey).cloned().unwrap_or_default();
            bytes.push(NON_DUP_MARKER);
            bytes.push(meta.is_signer as u8);
            bytes.push(meta.is_writable as u8);
            bytes.push(account.executable as u8);
            bytes.extend_from_slice(&[0u8; 4]);
            bytes.extend_from_slice(meta.pubkey.as_ref());
            bytes.extend_from_slice(account.owner.as_ref());
            bytes.extend_from_slice(&account.lamports.to_le_bytes());
            bytes.extend_from_slice(&(account.data.len() as u64).to_le_bytes());
            bytes.extend_from_slice(&account.data);
            bytes.resize(bytes.len() + MAX_PERMITTED_DATA_INCREASE, 0);
            bytes.resize(bytes.len().next_multiple_of(BPF_ALIGN_OF_U128), 0);
            bytes.extend_from_slice(&0u64.to_le_bytes());
        }

        bytes.extend_from_slice(&(instruction.data.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&instruction.data);
        bytes.extend_from_slice(instruction.program_id.as_ref());

        bytes
            .chunks(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word[..chunk.len()].copy_from_slice(chunk);
                u64::from_ne_bytes(word)
            })
            .collect()
    }
}

fn pda(seeds: &[&[u8]]) -> (Pubkey, u8) {
    Pubkey::find_program_address(seeds, &swap::ID)
}

fn swap_error(error: SwapError) -> ProgramResult {
    Err(ProgramError::Custom(error.into()))
}

/// An Ongoing 500 -> 250 offer at 2% with one whitelisted taker.
struct Market {
    runtime: Runtime,
    admin: Pubkey,
    maker: Pubkey,
    taker: Pubkey,
    admin_config: Pubkey,
    protocol_stats: Pubkey,
    offer: Pubkey,
    vault: Pubkey,
    whitelist: Pubkey,
    maker_input: Pubkey,
    maker_output: Pubkey,
    taker_input: Pubkey,
    taker_output: Pubkey,
    fee_output: Pubkey,
}

impl Market {
    fn open(vault_amount: u64, with_whitelist: bool) -> Self {
        let mut runtime = Runtime::new();
        let admin = Pubkey::new_unique();
        let maker = Pubkey::new_unique();
        let taker = Pubkey::new_unique();
        let fee_wallet = Pubkey::new_unique();
        let input_mint = Pubkey::new_unique();
        let output_mint = Pubkey::new_unique();

        let (admin_config, admin_bump) = pda(&[ADMIN_CONFIG_SEED]);
        let (protocol_stats, stats_bump) = pda(&[PROTOCOL_STATS_SEED]);
        let (offer, offer_bump) = pda(&[OFFER_SEED, maker.as_ref(), &OFFER_ID.to_le_bytes()]);
        let (vault, _) = pda(&[VAULT_SEED, offer.as_ref()]);
        let (whitelist, whitelist_bump) =
            pda(&[TAKER_WHITELIST_SEED, maker.as_ref(), &OFFER_ID.to_le_bytes()]);

        runtime.fund(admin, MAKER_LAMPORTS);
        runtime.fund(maker, MAKER_LAMPORTS);
        runtime.fund(taker, MAKER_LAMPORTS);
        runtime.put_program_account(
            admin_config,
            &AdminConfig { admin, is_initialized: true, bump: admin_bump },
            AdminConfig::SPACE,
        );
        runtime.put_program_account(
            protocol_stats,
            &ProtocolStats { total_offers: 1, active_offers: 1, bump: stats_bump, ..Default::default() },
            ProtocolStats::SPACE,
        );
        runtime.put_program_account(
            offer,
            &Offer {
                offer_id: OFFER_ID,
                maker,
                input_token_mint: input_mint,
                output_token_mint: output_mint,
                initial_amount: 500,
                expected_total_amount: 250,
                remaining_amount: 500,
                fulfilled_output_amount: 0,
                deadline: DEADLINE,
                status: OfferStatus::Ongoing,
                fee_percentage: 200,
                fee_wallet,
                vault,
                created_at: NOW,
                updated_at: NOW,
                bump: offer_bump,
            },
            Offer::SPACE,
        );
        if with_whitelist {
            runtime.put_program_account(
                whitelist,
                &TakerWhitelist { maker, offer, takers: vec![taker], bump: whitelist_bump },
                TakerWhitelist::SPACE,
            );
        }

        let maker_input = Pubkey::new_unique();
        let maker_output = Pubkey::new_unique();
        let taker_input = Pubkey::new_unique();
        let taker_output = Pubkey::new_unique();
        let fee_output = Pubkey::new_unique();
        runtime.put_token_account(vault, input_mint, offer, vault_amount);
        runtime.put_token_account(maker_input, input_mint, maker, 0);
        runtime.put_token_account(maker_output, output_mint, maker, 0);
        runtime.put_token_account(taker_input, input_mint, taker, 0);
        runtime.put_token_account(taker_output, output_mint, taker, 1_000);
        runtime.put_token_account(fee_output, output_mint, fee_wallet, 0);

        Market {
            runtime,
            admin,
            maker,
            taker,
            admin_config,
            protocol_stats,
            offer,
            vault,
            whitelist,
            maker_input,
            maker_output,
            taker_input,
            taker_output,
            fee_output,
        }
    }

    fn take(&mut self, input_token_amount: u64, now: i64) -> ProgramResult {
        let instruction = Instruction {
            program_id: swap::ID,
            accounts: swap::accounts::TakeOffer {
                taker: self.taker,
                offer: self.offer,
                maker: self.maker,
                whitelist: self.whitelist,
                protocol_stats: self.protocol_stats,
                vault: self.vault,
                taker_payment_token_account: self.taker_output,
                taker_receive_token_account: self.taker_input,
                maker_receive_token_account: self.maker_output,
                maker_token_account: self.maker_input,
                fee_token_account: self.fee_output,
                token_program: spl_token::ID,
            }
            .to_account_metas(None),
            data: swap::instruction::TakeOffer { input_token_amount }.data(),
        };
        self.runtime.process(instruction, now)
    }

    fn cancel(&mut self, signer: Pubkey) -> ProgramResult {
        let instruction = Instruction {
            program_id: swap::ID,
            accounts: swap::accounts::CancelOffer {
                maker: signer,
                offer: self.offer,
                whitelist: self.whitelist,
                maker_token_account: self.maker_input,
                vault: self.vault,
                protocol_stats: self.protocol_stats,
                token_program: spl_token::ID,
            }
            .to_account_metas(None),
            data: swap::instruction::CancelOffer {}.data(),
        };
        self.runtime.process(instruction, NOW + 1)
    }

    fn expire(&mut self, signer: Pubkey, now: i64) -> ProgramResult {
        let instruction = Instruction {
            program_id: swap::ID,
            accounts: swap::accounts::ExpireOffer {
                admin: signer,
                admin_config: self.admin_config,
                offer: self.offer,
                maker: self.maker,
                whitelist: self.whitelist,
                maker_token_account: self.maker_input,
                vault: self.vault,
                protocol_stats: self.protocol_stats,
                token_program: spl_token::ID,
            }
            .to_account_metas(None),
            data: swap::instruction::ExpireOffer {}.data(),
        };
        self.runtime.process(instruction, now)
    }

    fn offer_status(&self) -> OfferStatus {
        self.runtime.load::<Offer>(&self.offer).status
    }

    fn stats(&self) -> ProtocolStats {
        self.runtime.load(&self.protocol_stats)
    }

    fn assert_escrow_closed(&self, maker_lamports_before: u64, closed_rent: u64) {
        assert_eq!(self.runtime.lamports(&self.vault), 0);
        assert_eq!(self.runtime.lamports(&self.whitelist), 0);
        assert_eq!(self.runtime.accounts[&self.vault].owner, Pubkey::default());
        assert_eq!(self.runtime.lamports(&self.maker), maker_lamports_before + closed_rent);
    }
}

#[test]
fn completing_fill_settles_and_closes_escrow() {
    let mut market = Market::open(500, true);

    market.take(100, NOW + 1).unwrap();
    assert_eq!(market.runtime.token_balance(&market.fee_output), 1);
    assert_eq!(market.runtime.token_balance(&market.maker_output), 49);
    assert_eq!(market.runtime.token_balance(&market.taker_input), 100);
    assert_eq!(market.runtime.token_balance(&market.vault), 400);
    assert_eq!(market.offer_status(), OfferStatus::Ongoing);

    let maker_lamports = market.runtime.lamports(&market.maker);
    market.take(400, NOW + 2).unwrap();

    assert_eq!(market.runtime.token_balance(&market.fee_output), 5);
    assert_eq!(market.runtime.token_balance(&market.maker_output), 245);
    assert_eq!(market.runtime.token_balance(&market.taker_output), 750);
    assert_eq!(market.runtime.token_balance(&market.taker_input), 500);
    assert_eq!(market.runtime.token_balance(&market.maker_input), 0);
    assert_eq!(market.offer_status(), OfferStatus::Completed);
    market.assert_escrow_closed(maker_lamports, TOKEN_ACCOUNT_RENT + PROGRAM_ACCOUNT_RENT);

    let stats = market.stats();
    assert_eq!(stats.active_offers, 0);
    assert_eq!(stats.completed_offers, 1);
}

#[test]
fn completing_fill_sweeps_tokens_sent_to_the_vault() {
    let mut market = Market::open(501, true);
    let maker_lamports = market.runtime.lamports(&market.maker);

    market.take(500, NOW + 1).unwrap();

    assert_eq!(market.runtime.token_balance(&market.taker_input), 500);
    assert_eq!(market.runtime.token_balance(&market.maker_input), 1);
    assert_eq!(market.offer_status(), OfferStatus::Completed);
    market.assert_escrow_closed(maker_lamports, TOKEN_ACCOUNT_RENT + PROGRAM_ACCOUNT_RENT);
}

#[test]
fn cancel_refunds_whole_vault_and_closes_whitelist() {
    let mut market = Market::open(501, true);
    let maker_lamports = market.runtime.lamports(&market.maker);

    market.cancel(market.maker).unwrap();

    assert_eq!(market.runtime.token_balance(&market.maker_input), 501);
    assert_eq!(market.offer_status(), OfferStatus::Cancelled);
    market.assert_escrow_closed(maker_lamports, TOKEN_ACCOUNT_RENT + PROGRAM_ACCOUNT_RENT);
    assert_eq!(market.stats().cancelled_offers, 1);
    assert_eq!(market.stats().active_offers, 0);
}

#[test]
fn cancel_without_whitelist_closes_vault() {
    let mut market = Market::open(500, false);
    let maker_lamports = market.runtime.lamports(&market.maker);

    market.cancel(market.maker).unwrap();

    assert_eq!(market.runtime.token_balance(&market.maker_input), 500);
    market.assert_escrow_closed(maker_lamports, TOKEN_ACCOUNT_RENT);
}

#[test]
fn cancel_by_stranger_moves_nothing() {
    let mut market = Market::open(500, true);

    assert_eq!(market.cancel(market.taker), swap_error(SwapError::CannotCancelOffer));
    assert_eq!(market.runtime.token_balance(&market.vault), 500);
    assert_eq!(market.runtime.lamports(&market.whitelist), PROGRAM_ACCOUNT_RENT);
    assert_eq!(market.offer_status(), OfferStatus::Ongoing);
}

#[test]
fn expire_is_admin_only_and_waits_for_deadline() {
    let mut market = Market::open(500, true);
    let maker_lamports = market.runtime.lamports(&market.maker);

    assert_eq!(market.expire(market.maker, DEADLINE + 1), swap_error(SwapError::UnauthorizedAdmin));
    assert_eq!(market.expire(market.admin, DEADLINE), swap_error(SwapError::OfferNotExpired));
    assert_eq!(market.take(1, DEADLINE + 1), swap_error(SwapError::OfferExpired));

    market.expire(market.admin, DEADLINE + 1).unwrap();

    assert_eq!(market.runtime.token_balance(&market.maker_input), 500);
    assert_eq!(market.offer_status(), OfferStatus::Expired);
    market.assert_escrow_closed(maker_lamports, TOKEN_ACCOUNT_RENT + PROGRAM_ACCOUNT_RENT);
    assert_eq!(market.stats().expired_offers, 1);
}

#[test]
fn take_without_whitelist_is_rejected_as_not_whitelisted() {
    let mut market = Market::open(500, false);

    assert_eq!(market.take(100, NOW + 1), swap_error(SwapError::TakerNotWhitelisted));
    assert_eq!(market.runtime.token_balance(&market.vault), 500);
    assert_eq!(market.runtime.token_balance(&market.taker_output), 1_000);
}

#[test]
fn admin_instructions_before_initialize_report_not_initialized() {
    let mut runtime = Runtime::new();
    let admin = Pubkey::new_unique();
    runtime.fund(admin, MAKER_LAMPORTS);
    let (admin_config, _) = pda(&[ADMIN_CONFIG_SEED]);
    let (mint_whitelist, _) = pda(&[MINT_WHITELIST_SEED]);
    let (fee_config, _) = pda(&[FEE_CONFIG_SEED]);

    let add_mints = Instruction {
        program_id: swap::ID,
        accounts: swap::accounts::ModifyMintWhitelist { admin, admin_config, mint_whitelist }
            .to_account_metas(None),
        data: swap::instruction::AddMintsToWhitelist { new_mints: vec![Pubkey::new_unique()] }.data(),
    };
    assert_eq!(runtime.process(add_mints, NOW), swap_error(SwapError::AdminNotInitialized));

    let update_fee = Instruction {
        program_id: swap::ID,
        accounts: swap::accounts::UpdateFee { admin, admin_config, fee_config }.to_account_metas(None),
        data: swap::instruction::UpdateFeePercentage { new_fee: 100 }.data(),
    };
    assert_eq!(runtime.process(update_fee, NOW), swap_error(SwapError::AdminNotInitialized));
}

#[test]
fn fee_update_is_admin_only_and_persisted() {
    let mut market = Market::open(500, true);
    let (fee_config, fee_bump) = pda(&[FEE_CONFIG_SEED]);
    let fee_wallet = Pubkey::new_unique();
    market.runtime.put_program_account(
        fee_config,
        &FeeConfig { fee_percentage: 200, fee_address: fee_wallet, bump: fee_bump },
        FeeConfig::SPACE,
    );

    let update_fee = |admin: Pubkey, new_fee: u64| Instruction {
        program_id: swap::ID,
        accounts: swap::accounts::UpdateFee { admin, admin_config: market.admin_config, fee_config }
            .to_account_metas(None),
        data: swap::instruction::UpdateFeePercentage { new_fee }.data(),
    };
    let by_maker = update_fee(market.maker, 300);
    let by_admin = update_fee(market.admin, 300);
    let too_high = update_fee(market.admin, 10_001);

    assert_eq!(market.runtime.process(by_maker, NOW), swap_error(SwapError::UnauthorizedAdmin));
    assert_eq!(market.runtime.process(too_high, NOW), swap_error(SwapError::InvalidFeePercentage));
    market.runtime.process(by_admin, NOW).unwrap();

    let stored: FeeConfig = market.runtime.load(&fee_config);
    assert_eq!(stored.fee_percentage, 300);
    assert_eq!(stored.fee_address, fee_wallet);

    // Open offers keep the fee they were created with
    market.take(100, NOW + 1).unwrap();
    assert_eq!(market.runtime.token_balance(&market.fee_output), 1);
}
