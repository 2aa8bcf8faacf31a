#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        error::EnvError,
        gym::{Action, EnvConfig, TradingEnv},
        types::{PortfolioSnapshot, PriceBar},
    };

    fn bars(count: usize) -> Vec<PriceBar> {
        (0..count)
            .map(|i| {
                let open = 100. + (i % 7) as f64 * 3.;
                let close = if i % 2 == 0 { open + 4. } else { open - 4. };
                PriceBar::new(open, open.max(close) + 2., open.min(close) - 2., close, 1_000.)
            })
            .collect()
    }

    /// Open equals close so every execution price is known
    fn crashing_bars(count: usize) -> Vec<PriceBar> {
        (0..count)
            .map(|i| {
                let price = 100. * 0.97f64.powi(i as i32);
                PriceBar::new(price, price, price, price, 1_000.)
            })
            .collect()
    }

    fn config(lookback: usize, seed: u64) -> EnvConfig {
        EnvConfig {
            initial_balance: 1000.,
            lookback_window_size: lookback,
            seed: Some(seed),
        }
    }

    fn assert_windows(env: &TradingEnv) {
        let observation = env.observation();
        let lookback = env.lookback_window_size();

        assert_eq!(observation.market_history.len(), lookback);
        assert_eq!(observation.orders_history.len(), lookback);

        let first = env.current_step() + 1 - lookback;
        assert_eq!(
            observation.market_history.as_slice(),
            &env.bars()[first..=env.current_step()]
        );
        assert_eq!(observation.latest_order(), Some(&env.portfolio()));
    }

    /// `recorded` holds every snapshot since the reset, oldest first
    fn assert_orders(env: &TradingEnv, recorded: &[PortfolioSnapshot]) {
        let lookback = env.lookback_window_size();
        assert!(recorded.len() >= lookback);
        assert_eq!(
            env.observation().orders_history.as_slice(),
            &recorded[recorded.len() - lookback..]
        );
    }

    #[test]
    fn evaluation_reset_walks_whole_dataset() {
        let mut env = TradingEnv::new(bars(100), config(10, 1)).unwrap();
        let observation = env.reset(0).unwrap();

        assert_eq!(env.start_step(), 10);
        assert_eq!(env.end_step(), 99);
        assert_eq!(env.current_step(), 10);
        assert_eq!(observation.len(), 10);
        assert_eq!(observation.market_history.as_slice(), &bars(100)[1..=10]);
        assert!(observation.orders_history.iter().all(|order| {
            order.balance == 1000.
                && order.net_worth == 1000.
                && order.crypto_held == 0.
                && order.crypto_bought == 0.
                && order.crypto_sold == 0.
        }));
        assert_windows(&env);
    }

    #[test]
    fn buy_fills_between_open_and_close() {
        let mut data = bars(100);
        data[11] = PriceBar::new(100., 112., 98., 110., 500.);

        let mut env = TradingEnv::new(data, config(10, 2)).unwrap();
        env.reset(0).unwrap();
        let step = env.step(Action::Buy).unwrap();

        assert_eq!(env.current_step(), 11);
        assert!((100. ..=110.).contains(&step.execution_price));
        assert!(env.crypto_bought() >= 1000. / 110. - 1e-9);
        assert!(env.crypto_bought() <= 1000. / 100. + 1e-9);
        assert!(env.balance().abs() < 1e-9);
        assert_eq!(env.crypto_held(), env.crypto_bought());
        assert_windows(&env);
    }

    #[test]
    fn training_reset_stays_in_range() {
        let mut env = TradingEnv::new(bars(100), config(10, 3)).unwrap();

        for _ in 0..50 {
            env.reset(30).unwrap();
            assert!(env.start_step() >= 10);
            assert!(env.start_step() <= 99 - 30);
            assert_eq!(env.end_step(), env.start_step() + 30);
            assert_eq!(env.current_step(), env.start_step());
            assert_windows(&env);
        }

        // the only valid start
        env.reset(89).unwrap();
        assert_eq!(env.start_step(), 10);
        assert_eq!(env.end_step(), 99);
    }

    #[test]
    fn episode_too_long_for_dataset() {
        let mut env = TradingEnv::new(bars(100), config(10, 4)).unwrap();
        env.step(Action::Buy).unwrap();
        let before = (env.current_step(), env.net_worth(), env.crypto_held());

        for episode_length in [90, 99, 100, 1_000] {
            assert_eq!(
                env.reset(episode_length),
                Err(EnvError::InvalidEpisodeConfiguration {
                    episode_length,
                    total_steps: 99,
                    lookback: 10,
                })
            );
        }

        assert_eq!(before, (env.current_step(), env.net_worth(), env.crypto_held()));
    }

    #[test]
    fn step_past_episode_end_fails() {
        let mut env = TradingEnv::new(bars(100), config(10, 5)).unwrap();
        env.reset(5).unwrap();

        for _ in 0..5 {
            env.step(Action::Hold).unwrap();
        }
        assert!(env.is_episode_end());

        let net_worth = env.net_worth();
        assert_eq!(
            env.step(Action::Buy),
            Err(EnvError::OutOfRangeStep {
                step: env.end_step(),
                end_step: env.end_step(),
            })
        );
        assert_eq!(env.net_worth(), net_worth);
        assert_eq!(env.crypto_held(), 0.);

        env.reset(0).unwrap();
        for _ in 10..99 {
            env.step(Action::Hold).unwrap();
        }
        assert_eq!(env.current_step(), 99);
        assert!(matches!(
            env.step(Action::Sell),
            Err(EnvError::OutOfRangeStep { step: 99, end_step: 99 })
        ));
    }

    #[test]
    fn hold_changes_nothing_but_valuation() {
        let mut env = TradingEnv::new(bars(100), config(10, 6)).unwrap();
        env.reset(0).unwrap();
        env.step(Action::Buy).unwrap();

        let balance = env.balance();
        let crypto_held = env.crypto_held();
        let step = env.step(Action::Hold).unwrap();

        assert_eq!(env.balance(), balance);
        assert_eq!(env.crypto_held(), crypto_held);
        assert_eq!(env.crypto_bought(), 0.);
        assert_eq!(env.crypto_sold(), 0.);
        assert_eq!(env.net_worth(), balance + crypto_held * step.execution_price);
    }

    #[test]
    fn sell_liquidates_at_execution_price() {
        let mut env = TradingEnv::new(bars(100), config(10, 7)).unwrap();
        env.reset(0).unwrap();
        env.step(Action::Buy).unwrap();

        let balance = env.balance();
        let crypto_held = env.crypto_held();
        let step = env.step(Action::Sell).unwrap();

        assert_eq!(env.crypto_held(), 0.);
        assert_eq!(env.crypto_sold(), crypto_held);
        assert_eq!(env.balance(), balance + crypto_held * step.execution_price);
        assert_eq!(env.net_worth(), env.balance());
    }

    #[test]
    fn infeasible_trades_behave_as_hold() {
        let mut env = TradingEnv::new(bars(100), config(10, 8)).unwrap();
        env.reset(0).unwrap();

        env.step(Action::Sell).unwrap();
        assert_eq!(env.balance(), 1000.);
        assert_eq!(env.crypto_sold(), 0.);
        assert_eq!(env.net_worth(), 1000.);

        env.step(Action::Buy).unwrap();
        let crypto_held = env.crypto_held();
        env.step(Action::Buy).unwrap();
        assert_eq!(env.balance(), 0.);
        assert_eq!(env.crypto_bought(), 0.);
        assert_eq!(env.crypto_held(), crypto_held);
    }

    #[test]
    fn repeated_buys_after_all_in_never_fill() {
        for seed in 0..20 {
            let mut env = TradingEnv::new(bars(100), config(10, seed)).unwrap();
            env.step(Action::Buy).unwrap();
            assert_eq!(env.balance(), 0.);

            let crypto_held = env.crypto_held();
            for _ in 0..10 {
                env.step(Action::Buy).unwrap();
                assert_eq!(env.crypto_bought(), 0.);
                assert_eq!(env.crypto_held(), crypto_held);
            }
        }
    }

    #[test]
    fn zero_price_bars_are_dropped() {
        let mut data = bars(30);
        data[6] = PriceBar::new(0., 0., 0., 0., 0.);
        data[12].close = 0.;

        let mut env = TradingEnv::new(data, config(5, 13)).unwrap();
        assert_eq!(env.total_steps(), 27);

        while !env.is_episode_end() {
            let step = env.step(Action::Buy).unwrap();
            assert!(env.crypto_held().is_finite());
            assert!(env.net_worth().is_finite());
            assert!(step.reward.is_finite());
        }
    }

    #[test]
    fn random_play_keeps_invariants() {
        for seed in 0..20 {
            let mut env = TradingEnv::new(bars(120), config(10, seed)).unwrap();
            let mut rng = StdRng::seed_from_u64(seed + 100);
            env.reset(0).unwrap();
            let mut recorded = vec![env.portfolio(); env.lookback_window_size()];

            while !env.is_episode_end() {
                let net_worth_before = env.net_worth();
                let step = env.step(Action::random(&mut rng)).unwrap();
                recorded.push(env.portfolio());

                assert_windows(&env);
                assert_orders(&env, &recorded);
                assert!(env.balance() >= 0.);
                assert!(env.crypto_held() >= 0.);
                assert!(env.start_step() <= env.current_step());
                assert!(env.current_step() <= env.end_step());
                assert_eq!(env.prev_net_worth(), net_worth_before);
                assert_eq!(step.reward, env.net_worth() - net_worth_before);
                assert_eq!(step.done, env.net_worth() <= 500.);
                assert_eq!(step.observation, env.observation());
            }
        }
    }

    #[test]
    fn losing_half_the_balance_is_done() {
        let mut env = TradingEnv::new(crashing_bars(60), config(5, 9)).unwrap();
        env.reset(0).unwrap();

        let step = env.step(Action::Buy).unwrap();
        assert!(!step.done);

        let mut done_at = None;
        while !env.is_episode_end() {
            let step = env.step(Action::Hold).unwrap();
            assert_eq!(step.done, env.net_worth() <= 500.);
            assert!(step.reward < 0.);
            if step.done && done_at.is_none() {
                done_at = Some(env.current_step());
            }
        }

        // 0.97^23 is the first power below one half
        assert_eq!(done_at, Some(6 + 23));
    }

    #[test]
    fn same_seed_same_episode() {
        let play = |seed| {
            let mut env = TradingEnv::new(bars(100), config(10, seed)).unwrap();
            env.reset(40).unwrap();
            let mut prices = vec![env.start_step() as f64];
            for action in [Action::Buy, Action::Hold, Action::Sell, Action::Buy] {
                prices.push(env.step(action).unwrap().execution_price);
            }
            prices
        };

        assert_eq!(play(11), play(11));
    }

    #[test]
    fn incomplete_bars_are_dropped() {
        let mut data = bars(30);
        data[3].close = f64::NAN;
        data[17].volume = f64::NAN;

        let env = TradingEnv::new(data, config(5, 10)).unwrap();

        assert_eq!(env.total_steps(), 27);
        assert!(env.bars().iter().all(PriceBar::is_complete));
        assert_eq!(env.bars()[3], bars(30)[4]);
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            TradingEnv::new(bars(20), config(0, 0)).unwrap_err(),
            EnvError::InvalidLookbackWindow
        );
        assert_eq!(
            TradingEnv::new(bars(10), config(10, 0)).unwrap_err(),
            EnvError::InsufficientData {
                bars: 10,
                lookback: 10
            }
        );
        assert!(TradingEnv::new(bars(11), config(10, 0)).is_ok());

        for initial_balance in [0., -1000., f64::NAN, f64::INFINITY] {
            let invalid = EnvConfig {
                initial_balance,
                ..config(10, 0)
            };
            assert!(matches!(
                TradingEnv::new(bars(20), invalid),
                Err(EnvError::InvalidInitialBalance(_))
            ));
        }
    }

    #[test]
    fn default_config() {
        let config = EnvConfig::default();
        assert_eq!(config.initial_balance, 1000.);
        assert_eq!(config.lookback_window_size, 50);

        let env = TradingEnv::new(bars(60), config).unwrap();
        assert_eq!(env.state_size(), (50, 10));
        assert_eq!(env.observation().features().len(), 50);
    }

    #[test]
    fn status_line_reports_step_and_net_worth() {
        let env = TradingEnv::new(bars(30), config(10, 12)).unwrap();
        assert_eq!(env.status_line(), "Step: 10, Net Worth: 1000");
    }
}
