use std::collections::VecDeque;

use serde::Serialize;

use crate::config::StandConfig;
use crate::scheduler::EventScheduler;
use crate::types::CustomerId;

/// A customer as logged by the stand. Balking customers have
/// `service_start_date == service_end_date == arrival_date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub arrival_date: f64,
    pub admitted: bool,
    pub service_start_date: f64,
    pub service_end_date: f64,
}

/// Mutable state of one stand over one run.
pub struct StandState {
    pub stock: u64,
    pub cost: f64,
    pub sales: f64,
    pub clock: f64,
    pub warmup: f64,
    pub horizon: f64,
    pub scheduler: EventScheduler,
    /// Every arrival in arrival order, admitted or not.
    pub customers: Vec<Customer>,
    pub admitted: u64,
    pub balked: u64,
    pub units_resupplied: u64,
    /// Service end dates of admitted customers, oldest first. FIFO service
    /// makes these non-decreasing, so expired entries sit at the front.
    outstanding: VecDeque<f64>,
    last_service_end: Option<f64>,
    retail_price: f64,
    wholesale_price: f64,
    replenishment_period: f64,
    replenishment_quantity: u32,
}

impl StandState {
    /// Stand stocked with one batch. The batch is charged only when there is
    /// no warm-up, since otherwise it predates the measurement window.
    pub fn new(config: &StandConfig, horizon: f64, warmup: f64, first_arrival: f64) -> Self {
        let quantity = config.replenishment_quantity;
        let cost = if warmup > 0.0 { 0.0 } else { quantity as f64 * config.wholesale_price };
        StandState {
            stock: quantity as u64,
            cost,
            sales: 0.0,
            clock: 0.0,
            warmup,
            horizon,
            scheduler: EventScheduler::new(first_arrival, config.replenishment_period),
            customers: Vec::new(),
            admitted: 0,
            balked: 0,
            units_resupplied: 0,
            outstanding: VecDeque::new(),
            last_service_end: None,
            retail_price: config.retail_price,
            wholesale_price: config.wholesale_price,
            replenishment_period: config.replenishment_period,
            replenishment_quantity: quantity,
        }
    }

    /// Admitted customers whose service ends after `t`. Calls must use
    /// non-decreasing `t`; entries ending at or before it are dropped.
    pub fn customers_at_stand(&mut self, t: f64) -> usize {
        while self.outstanding.front().is_some_and(|&end| end <= t) {
            self.outstanding.pop_front();
        }
        self.outstanding.len()
    }

    /// Apply an arrival at `t`. `service` is drawn only if the customer is
    /// admitted. Returns whether the customer was admitted.
    pub fn arrive(&mut self, t: f64, service: impl FnOnce() -> f64) -> bool {
        let id = CustomerId(self.customers.len() as u64);
        let occupancy = self.customers_at_stand(t) as u64;

        let customer = if occupancy < self.stock {
            let start = self.last_service_end.map_or(t, |end| end.max(t));
            let end = start + service();
            self.last_service_end = Some(end);
            self.outstanding.push_back(end);
            self.stock -= 1;
            self.admitted += 1;
            if t > self.warmup {
                self.sales += self.retail_price;
            }
            Customer {
                id,
                arrival_date: t,
                admitted: true,
                service_start_date: start,
                service_end_date: end,
            }
        } else {
            self.balked += 1;
            Customer {
                id,
                arrival_date: t,
                admitted: false,
                service_start_date: t,
                service_end_date: t,
            }
        };

        let admitted = customer.admitted;
        self.customers.push(customer);
        admitted
    }

    /// Apply the pending resupply and schedule the next one.
    pub fn restock(&mut self) {
        let date = self.scheduler.next_restock_date;
        self.stock += self.replenishment_quantity as u64;
        self.units_resupplied += self.replenishment_quantity as u64;
        self.scheduler.next_restock_date = date + self.replenishment_period;
        if date > self.warmup {
            self.cost += self.replenishment_quantity as f64 * self.wholesale_price;
        }
    }

    pub fn replenishment_quantity(&self) -> u32 {
        self.replenishment_quantity
    }

    pub fn profit(&self) -> f64 {
        self.sales - self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stand(warmup: f64) -> StandState {
        StandState::new(&StandConfig::canonical(), 1000.0, warmup, 1.0)
    }

    #[test]
    fn initial_batch_charged_without_warmup() {
        let s = stand(0.0);
        assert_eq!(s.stock, 8);
        assert_eq!(s.cost, 24.0);
        assert_eq!(s.sales, 0.0);
        assert_eq!(s.scheduler.next_restock_date, 10.0);
        assert!(s.customers.is_empty());
    }

    #[test]
    fn initial_batch_suppressed_with_warmup() {
        let s = stand(500.0);
        assert_eq!(s.stock, 8);
        assert_eq!(s.cost, 0.0);
    }

    #[test]
    fn restock_adds_batch_and_schedules_next() {
        let mut s = stand(0.0);
        s.restock();
        assert_eq!(s.stock, 16);
        assert_eq!(s.scheduler.next_restock_date, 20.0);
        assert_eq!(s.cost, 48.0);
        assert_eq!(s.units_resupplied, 8);
    }

    #[test]
    fn restock_before_warmup_is_free() {
        let mut s = stand(15.0);
        s.restock(); // dated 10
        assert_eq!(s.cost, 0.0);
        s.restock(); // dated 20
        assert_eq!(s.cost, 24.0);
        assert_eq!(s.stock, 24);
    }

    #[test]
    fn restock_exactly_at_warmup_is_excluded() {
        let mut s = stand(10.0);
        s.restock();
        assert_eq!(s.cost, 0.0);
    }

    #[test]
    fn fifo_chain_and_occupancy() {
        let mut s = stand(0.0);
        assert!(s.arrive(5.0, || 5.0));
        assert!(s.arrive(6.0, || 1.0));
        assert!(s.arrive(7.0, || 1.0));

        let ends: Vec<f64> = s.customers.iter().map(|c| c.service_end_date).collect();
        assert_eq!(ends, vec![10.0, 11.0, 12.0]);
        assert_eq!(s.customers[1].service_start_date, 10.0);
        assert_eq!(s.customers[2].service_start_date, 11.0);

        assert_eq!(s.customers_at_stand(10.5), 2);
        assert_eq!(s.customers_at_stand(12.0), 0);
    }

    #[test]
    fn idle_server_starts_service_on_arrival() {
        let mut s = stand(0.0);
        assert!(s.arrive(1.0, || 0.5));
        assert!(s.arrive(3.0, || 0.5));
        assert_eq!(s.customers[1].service_start_date, 3.0);
        assert_eq!(s.customers[1].service_end_date, 3.5);
    }

    #[test]
    fn admission_decrements_stock_and_books_sale() {
        let mut s = stand(0.0);
        assert!(s.arrive(1.0, || 0.1));
        assert_eq!(s.stock, 7);
        assert_eq!(s.sales, 4.0);
        assert_eq!(s.admitted, 1);
    }

    #[test]
    fn sale_at_or_before_warmup_not_counted() {
        let mut s = stand(2.0);
        assert!(s.arrive(2.0, || 0.1));
        assert_eq!(s.sales, 0.0);
        assert!(s.arrive(2.5, || 0.1));
        assert_eq!(s.sales, 4.0);
        assert_eq!(s.stock, 6);
    }

    #[test]
    fn balk_when_occupancy_reaches_stock() {
        let config = StandConfig::canonical().with_policy(10.0, 2);
        let mut s = StandState::new(&config, 100.0, 0.0, 1.0);

        assert!(s.arrive(1.0, || 10.0)); // occupancy 0 < stock 2
        assert!(!s.arrive(2.0, || panic!("balking customer must not draw service")));
        // occupancy 1, stock 1: turned away

        let balker = &s.customers[1];
        assert!(!balker.admitted);
        assert_eq!(balker.service_start_date, 2.0);
        assert_eq!(balker.service_end_date, 2.0);
        assert_eq!(s.stock, 1);
        assert_eq!(s.balked, 1);
        assert_eq!(s.sales, 4.0);
        assert_eq!(s.customers.len(), 2);

        // Once the first customer leaves the last unit can be sold.
        assert!(s.arrive(11.5, || 1.0));
        assert_eq!(s.stock, 0);
    }

    #[test]
    fn empty_stand_turns_everyone_away() {
        let config = StandConfig::canonical().with_policy(10.0, 0);
        let mut s = StandState::new(&config, 100.0, 0.0, 1.0);
        for t in 1..5 {
            assert!(!s.arrive(t as f64, || 1.0));
        }
        assert_eq!(s.admitted, 0);
        assert_eq!(s.sales, 0.0);
        assert_eq!(s.customers_at_stand(5.0), 0);
    }
}
