#![no_main]

use libfuzzer_sys::fuzz_target;
use memory_view::{
    MemoryOperation, MemoryView, PointerRegister, RegisterId, RegisterOperation,
    RegisterSnapshot, ViewConfig,
};

const REGISTERS: [RegisterId; 16] = [
    RegisterId::A,
    RegisterId::AH,
    RegisterId::AL,
    RegisterId::B,
    RegisterId::BH,
    RegisterId::BL,
    RegisterId::C,
    RegisterId::CH,
    RegisterId::CL,
    RegisterId::D,
    RegisterId::DH,
    RegisterId::DL,
    RegisterId::Ssp,
    RegisterId::Usp,
    RegisterId::Ip,
    RegisterId::Sr,
];

fn register(byte: u8) -> RegisterId {
    REGISTERS[usize::from(byte) % REGISTERS.len()]
}

fuzz_target!(|data: &[u8]| {
    let snapshot = RegisterSnapshot::default();
    let Ok(mut view) = MemoryView::new(0x200, &snapshot, ViewConfig::all_markers()) else {
        return;
    };

    for chunk in data.chunks_exact(4) {
        let [kind, target, high, low] = [chunk[0], chunk[1], chunk[2], chunk[3]];
        let value = u16::from_be_bytes([high, low]);
        let address = usize::from(value);

        match kind % 11 {
            0 => view.apply_register_operation(&RegisterOperation::Write {
                index: register(target),
                value,
            }),
            1 => view.apply_register_operation(&RegisterOperation::WriteBit {
                index: register(target),
                bit_number: high,
                value: u16::from(low),
            }),
            2 => view.apply_register_operation(&RegisterOperation::Push {
                index: register(target),
                value,
            }),
            3 => view.apply_register_operation(&RegisterOperation::Pop {
                index: register(target),
                value,
            }),
            4 => view.apply_memory_operation(&MemoryOperation::StoreByte { address, value }),
            5 => view.apply_memory_operation(&MemoryOperation::StoreWord { address, value }),
            6 => view.apply_memory_operation(&MemoryOperation::AddRegion {
                region_id: format!("r{}", target % 4),
                name: format!("Fuzz{target}"),
                start_address: address,
                end_address: address + usize::from(target),
                initial_values: None,
            }),
            7 => view.apply_memory_operation(&MemoryOperation::RemoveRegion {
                region_id: format!("r{}", target % 4),
            }),
            8 => view.apply_memory_operation(&MemoryOperation::Reset),
            9 => view.set_instruction_mapping([address, address + 1]),
            _ => view.set_register_display(
                PointerRegister::GENERAL[usize::from(target % 4)],
                low & 1 == 1,
            ),
        }
    }

    let snapshot = view.style_snapshot();
    for cell in view.cells() {
        assert_eq!(cell.style(), snapshot.resolve(cell.address()));
    }
});
