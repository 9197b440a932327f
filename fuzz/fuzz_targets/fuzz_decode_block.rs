#![no_main]
use libfuzzer_sys::fuzz_target;
use vehicle_store::core::codec::{decode, encode};
use vehicle_store::RECORD_SIZE;

// Any 96 bytes either decode or fail as malformed; nothing panics
fuzz_target!(|data: &[u8]| {
    match decode(data) {
        Ok(vehicle) => {
            assert_eq!(data.len(), RECORD_SIZE);
            let again = decode(&encode(&vehicle).block).unwrap();
            assert_eq!(again.id, vehicle.id);
            assert_eq!(again.horsepower, vehicle.horsepower);
            assert_eq!(
                again.fuel_consumption.to_bits(),
                vehicle.fuel_consumption.to_bits()
            );
        }
        Err(e) => assert!(e.is_malformed()),
    }
});
