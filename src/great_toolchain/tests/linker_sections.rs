//! Checks the registration macros against a real link. Only ELF/Linux hosts
//! run `.preinit_array` and `.init_array` the same way our startup code does
//! and provide `__start_<section>`/`__stop_<section>` symbols.
#![cfg(target_os = "linux")]
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use great_toolchain::{
    call_before_reset, call_on_init, call_on_preinit, define_task, linker_array,
    linker_array::{FiniFn, InitFn, TaskFn},
};

static PREINIT_RAN: AtomicBool = AtomicBool::new(false);
static INIT_RAN: AtomicBool = AtomicBool::new(false);
static INIT_SAW_PREINIT: AtomicBool = AtomicBool::new(false);

unsafe extern "C" fn enable_caches() {
    PREINIT_RAN.store(true, Ordering::SeqCst);
}

extern "C" fn setup_clocks() {
    INIT_SAW_PREINIT.store(PREINIT_RAN.load(Ordering::SeqCst), Ordering::SeqCst);
    INIT_RAN.store(true, Ordering::SeqCst);
}

unsafe extern "C" fn flush_uart() {}

extern "C" fn blink_led() {}

call_on_preinit!(enable_caches);
call_on_init!(setup_clocks);
call_before_reset!(flush_uart);
define_task!(blink_led);

#[test]
fn init_runs_before_main() {
    assert!(INIT_RAN.load(Ordering::SeqCst));
}

// musl doesn't walk `.preinit_array`
#[cfg(target_env = "gnu")]
#[test]
fn preinit_runs_before_init() {
    assert!(PREINIT_RAN.load(Ordering::SeqCst));
    assert!(INIT_SAW_PREINIT.load(Ordering::SeqCst));
}

#[test]
fn registered_statics_hold_the_function() {
    let preinit: InitFn = enable_caches_initcall_p;
    let init: InitFn = setup_clocks_initcall_p;
    let fini: FiniFn = flush_uart_finalizer_p;
    let task: TaskFn = blink_led_implementation_p;

    assert_eq!(preinit as usize, enable_caches as InitFn as usize);
    assert_eq!(init as usize, setup_clocks as InitFn as usize);
    assert_eq!(fini as usize, flush_uart as FiniFn as usize);
    assert_eq!(task as usize, blink_led as TaskFn as usize);
}

static TASK_CALLS: AtomicUsize = AtomicUsize::new(0);
static INIT_CALLS: AtomicUsize = AtomicUsize::new(0);

extern "C" fn poll_usb() {
    TASK_CALLS.fetch_add(1, Ordering::SeqCst);
}

extern "C" fn poll_adc() {
    TASK_CALLS.fetch_add(10, Ordering::SeqCst);
}

extern "C" fn poll_buttons() {
    TASK_CALLS.fetch_add(100, Ordering::SeqCst);
}

unsafe extern "C" fn init_gpio() {
    INIT_CALLS.fetch_add(1, Ordering::SeqCst);
}

unsafe extern "C" fn init_spi() {
    INIT_CALLS.fetch_add(1, Ordering::SeqCst);
}

// Section names that are valid C identifiers get `__start_`/`__stop_`
// symbols from the linker, standing in for the ones our link script exports.
#[link_section = "great_test_tasks"]
#[used]
static POLL_USB: TaskFn = poll_usb;
#[link_section = "great_test_tasks"]
#[used]
static POLL_ADC: TaskFn = poll_adc;
#[link_section = "great_test_tasks"]
#[used]
static POLL_BUTTONS: TaskFn = poll_buttons;

#[link_section = "great_test_inits"]
#[used]
static INIT_GPIO: InitFn = init_gpio;
#[link_section = "great_test_inits"]
#[used]
static INIT_SPI: InitFn = init_spi;

linker_array! {
    fn test_tasks() -> LinkerArray<TaskFn> = __start_great_test_tasks..__stop_great_test_tasks;
    fn test_inits() -> LinkerArray<InitFn> = __start_great_test_inits..__stop_great_test_inits;
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn task_array_is_contiguous() {
    init_logger();
    let tasks = test_tasks().unwrap();
    log::debug!("tasks = {tasks:?}");
    assert_eq!(tasks.len(), 3);

    // The order within the section is up to the linker
    let mut addrs: Vec<usize> = tasks.iter().map(|&f| f as usize).collect();
    let mut expected = vec![
        poll_usb as TaskFn as usize,
        poll_adc as TaskFn as usize,
        poll_buttons as TaskFn as usize,
    ];
    addrs.sort_unstable();
    expected.sort_unstable();
    assert_eq!(addrs, expected);

    for task in tasks {
        task();
    }
    assert_eq!(TASK_CALLS.load(Ordering::SeqCst), 111);
}

#[test]
fn init_array_call_each() {
    init_logger();
    let inits = test_inits().unwrap();
    assert_eq!(inits.len(), 2);
    unsafe { inits.call_each() };
    assert_eq!(INIT_CALLS.load(Ordering::SeqCst), 2);
}
