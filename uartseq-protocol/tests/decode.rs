//! Decoder robustness against arbitrary streams

use proptest::prelude::*;
use uartseq_protocol::{Command, CommandReader, DecodeError, Opcode, SequenceBuilder};

proptest! {
    #[test]
    fn arbitrary_bytes_never_overrun(stream in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut reader = CommandReader::new(&stream);
        let mut consumed = 0usize;

        while let Some(result) = reader.next_command() {
            prop_assert!(reader.position() <= stream.len());
            match result {
                Ok(command) => {
                    consumed += command.encoded_len();
                    prop_assert_eq!(reader.position(), consumed);
                }
                Err(DecodeError::InvalidOpcode(byte)) => {
                    prop_assert!(Opcode::from_byte(byte).is_none());
                    break;
                }
                Err(DecodeError::Truncated { needed, remaining, .. }) => {
                    prop_assert!(needed > remaining);
                    break;
                }
            }
        }
    }

    #[test]
    fn every_truncation_of_a_command_is_reported(
        payload in proptest::collection::vec(any::<u8>(), 0..16),
        baud in any::<u32>(),
        size in any::<u16>(),
    ) {
        let commands = [
            Command::Send { data: &payload },
            Command::Receive { size, total_timeout_ms: 10, char_timeout_ms: 5 },
            Command::SetBaudRate { baud_rate: baud },
            Command::Delay { delay_ms: baud },
        ];

        for command in commands.iter() {
            let mut seq = SequenceBuilder::<64>::new();
            seq.push(command).unwrap();
            let bytes = seq.as_bytes();

            // Every strict prefix that still holds the opcode is truncated
            for cut in 1..bytes.len() {
                let mut reader = CommandReader::new(&bytes[..cut]);
                let is_truncated = matches!(
                    reader.next_command(),
                    Some(Err(DecodeError::Truncated { .. }))
                );
                prop_assert!(is_truncated);
            }

            let mut reader = CommandReader::new(bytes);
            prop_assert_eq!(reader.next_command(), Some(Ok(*command)));
        }
    }
}
